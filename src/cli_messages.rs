//! CLI command messaging system
//!
//! Consistent, color-tagged output for the one-shot commands.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Error,
    Success,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Tone::Info => "\x1b[1;33m[INFO]\x1b[0m",
            Tone::Error => "\x1b[1;31m[ERROR]\x1b[0m",
            Tone::Success => "\x1b[1;32m[SUCCESS]\x1b[0m",
        }
    }
}

/// One tagged line; details follow the title after a tab when present.
pub fn format_line(tone: Tone, title: &str, details: &str) -> String {
    if details.is_empty() {
        format!("{} {}", tone.tag(), title)
    } else {
        format!("{} {}\t {}", tone.tag(), title, details)
    }
}

pub fn print_info(title: &str, details: &str) {
    println!("{}", format_line(Tone::Info, title, details));
}

/// Errors go to stderr, details on their own line.
pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("{}", format_line(Tone::Error, title, ""));
    if let Some(details) = details {
        eprintln!("{}", format_line(Tone::Error, "Details:", details));
    }
}

pub fn print_success(title: &str, details: &str) {
    println!("{}", format_line(Tone::Success, title, details));
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_omits_empty_details() {
        assert_eq!(
            format_line(Tone::Success, "Saved", ""),
            "\x1b[1;32m[SUCCESS]\x1b[0m Saved"
        );
        assert!(format_line(Tone::Info, "Role", "not set").ends_with("Role\t not set"));
    }
}
