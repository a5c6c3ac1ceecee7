#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

use std::path::PathBuf;

/// Splits like a shell so quoted or backslash escaped paths stay whole.
/// Unbalanced quotes, such as an apostrophe in a prompt, fall back to plain
/// whitespace splitting.
fn split_args(text: &str) -> Vec<String> {
    match shell_words::split(text) {
        Ok(parts) => {
            return parts
                .into_iter()
                .filter(|e| return !e.is_empty())
                .collect();
        }
        Err(_) => {
            return text
                .split_whitespace()
                .map(|e| return e.to_string())
                .collect();
        }
    }
}

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = split_args(text);
        if args.is_empty() {
            return None;
        }

        let prefix = args.remove(0);
        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_add()
            || cmd.is_remove()
            || cmd.is_clear()
            || cmd.is_restore()
            || cmd.is_save()
            || cmd.is_suggest()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_add(&self) -> bool {
        return ["/a", "/add"].contains(&self.command.as_str());
    }

    pub fn is_remove(&self) -> bool {
        return ["/rm", "/remove"].contains(&self.command.as_str());
    }

    pub fn is_clear(&self) -> bool {
        return self.command == "/clear";
    }

    pub fn is_restore(&self) -> bool {
        return ["/r", "/restore"].contains(&self.command.as_str());
    }

    pub fn is_save(&self) -> bool {
        return ["/s", "/save"].contains(&self.command.as_str());
    }

    pub fn is_suggest(&self) -> bool {
        return self.command == "/suggest";
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    /// Paths for `/add`. An unquoted path containing spaces, as pasted from a
    /// file manager, is kept whole when it names an existing file.
    pub fn path_args(&self) -> Vec<PathBuf> {
        if self.args.len() > 1 {
            let joined = PathBuf::from(self.args.join(" "));
            if joined.is_file() {
                return vec![joined];
            }
        }

        return self.args.iter().map(PathBuf::from).collect();
    }

    /// The single path for `/save`, with every argument joined back together.
    pub fn path_arg(&self) -> Option<PathBuf> {
        if self.args.is_empty() {
            return None;
        }

        return Some(PathBuf::from(self.args.join(" ")));
    }

    /// Parses the first argument as a 1-based index into a list.
    pub fn index_arg(&self) -> Option<usize> {
        let idx = self.args.first()?.parse::<usize>().ok()?;
        if idx == 0 {
            return None;
        }

        return Some(idx - 1);
    }
}
