use std::fmt;

/// Where the host should go after the controller is done with a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/interview/{interview_id}/feedback`
    Feedback { interview_id: String },
}

impl Route {
    pub fn feedback(interview_id: &str) -> Self {
        Route::Feedback {
            interview_id: interview_id.to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Feedback { interview_id } => write!(f, "/interview/{interview_id}/feedback"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.to_string(), "/");
        assert_eq!(Route::feedback("i1").to_string(), "/interview/i1/feedback");
    }
}
