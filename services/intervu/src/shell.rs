//! Terminal rendering of the call view.

use intervu_core::Command;
use intervu_core::Input;
use intervu_core::session_state::CallStatus;

pub const INTERVIEWER_NAME: &str = "AI Interviewer";

/// Maps a line typed by the user to a controller input.
pub fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_lowercase().as_str() {
        "call" | "start" => Some(Input::StartCall),
        "end" | "hangup" => Some(Input::EndCall),
        "quit" | "exit" => Some(Input::Unmount),
        _ => None,
    }
}

/// The line printed for a host command, if any.
pub fn render_command(command: &Command) -> Option<String> {
    match command {
        Command::StatusChanged(CallStatus::Inactive) => None,
        Command::StatusChanged(CallStatus::Connecting) => Some("Connecting...".to_string()),
        Command::StatusChanged(CallStatus::Active) => {
            Some(format!("{INTERVIEWER_NAME} joined the call. Type `end` to hang up."))
        }
        Command::StatusChanged(CallStatus::Finished) => Some("Call ended.".to_string()),
        Command::ShowTranscript(line) => Some(format!("> {line}")),
        Command::SpeakingChanged(true) => Some(format!("({INTERVIEWER_NAME} is speaking)")),
        Command::SpeakingChanged(false) => None,
        Command::Navigate(route) => Some(format!("Leaving the call for {route}")),
        Command::Alert(message) => Some(format!("! {message}")),
    }
}

pub fn banner(user_name: &str) -> String {
    format!(
        "{INTERVIEWER_NAME} | {user_name} (You)\nType `call` to start, `end` to hang up, `quit` to leave."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use intervu_core::route::Route;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("call\n"), Some(Input::StartCall));
        assert_eq!(parse_input(" END "), Some(Input::EndCall));
        assert_eq!(parse_input("quit"), Some(Input::Unmount));
        assert_eq!(parse_input("hello"), None);
        assert_eq!(parse_input(""), None);
    }

    #[test]
    fn test_render_command() {
        assert_eq!(
            render_command(&Command::ShowTranscript("Tell me about yourself.".to_string())),
            Some("> Tell me about yourself.".to_string())
        );
        assert_eq!(
            render_command(&Command::Navigate(Route::feedback("i1"))),
            Some("Leaving the call for /interview/i1/feedback".to_string())
        );
        assert_eq!(render_command(&Command::SpeakingChanged(false)), None);
        assert_eq!(
            render_command(&Command::StatusChanged(CallStatus::Finished)),
            Some("Call ended.".to_string())
        );
    }

    #[test]
    fn test_banner_shows_user_name() {
        assert!(banner("Ada").starts_with("AI Interviewer | Ada (You)"));
    }
}
