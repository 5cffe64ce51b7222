#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    /// Switch study mode; the argument may be empty ("show current").
    Mode(String),
    /// Persist a theme preference; the value is validated by the caller.
    Theme(String),
    Clear,
    Quit,
    Unknown(String),
}

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut words = trimmed.split_whitespace();
    let command = words.next().unwrap_or(trimmed).to_string();
    let argument = words.collect::<Vec<_>>().join(" ");

    let parsed = match command.as_str() {
        "/help" => SlashCommand::Help,
        "/mode" => SlashCommand::Mode(argument),
        "/theme" => SlashCommand::Theme(argument),
        "/clear" => SlashCommand::Clear,
        "/quit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command),
    };

    Some(parsed)
}
