#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    StateGet,
    ApiKeySet,
    ApiKeySubmit,
    ApiKeyEdit,
    ApiKeyForget,
    LanguagesSet,
    LanguagesReverse,
    QueryInput,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "state.get" => Command::StateGet,
            "api_key.set" => Command::ApiKeySet,
            "api_key.submit" => Command::ApiKeySubmit,
            "api_key.edit" => Command::ApiKeyEdit,
            "api_key.forget" => Command::ApiKeyForget,
            "languages.set" => Command::LanguagesSet,
            "languages.reverse" => Command::LanguagesReverse,
            "query.input" => Command::QueryInput,
            _ => Command::Unknown,
        }
    }
}
