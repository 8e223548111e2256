pub const VAPI_WEB_TOKEN: &str = "VAPI_WEB_TOKEN";

pub const BASE_URL: &str = "wss://api.vapi.ai";
pub const CALL_PATH: &str = "/call/web/ws";

pub const AUTHORIZATION_HEADER: &str = "Authorization";
