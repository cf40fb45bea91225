use colored::*;
use std::io::{self, BufRead, Write};

/// Console handles terminal I/O for the agent binary with colored
/// formatting
pub struct Console {
    user_color: Color,
    assistant_color: Color,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self {
            user_color: Color::Cyan,
            assistant_color: Color::Green,
        }
    }

    /// Print the startup banner
    pub fn print_banner(&self) {
        println!("{}", "taskdesk agent".bold());
        println!("Type a request, or 'exit' to quit.");
        println!();
    }

    /// Print a user message with colored formatting
    pub fn print_user(&self, message: &str) {
        println!("{} {}", "User:".color(self.user_color).bold(), message);
    }

    /// Print a complete assistant message with colored formatting
    pub fn print_assistant(&self, message: &str) {
        println!(
            "{} {}",
            "Assistant:".color(self.assistant_color).bold(),
            message.color(self.assistant_color)
        );
    }

    /// Print a system message (warnings, info)
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message);
    }

    /// Print an error message
    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    /// Read one line of user input, prompting first
    pub fn read_input(&self) -> io::Result<String> {
        print!("{} ", "You:".color(self.user_color).bold());
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end().to_string())
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
