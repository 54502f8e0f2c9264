use std::io::{self, Write};

use colored::Colorize;
use lookout_core::OutputSink;

const RULE: &str = "============================================================";

/// Prints assistant output to stdout with colors.
pub struct TerminalSink;

impl TerminalSink {
    pub fn banner(title: &str) {
        println!("\n{}", RULE.bright_black());
        println!("{}", title.bright_yellow());
        println!("{}", RULE.bright_black());
    }
}

impl OutputSink for TerminalSink {
    fn begin_answer(&self) {
        println!("\n{}", "ASSISTANT:".bright_magenta().bold());
    }

    fn answer_chunk(&self, chunk: &str) {
        print!("{}", chunk.bright_blue());
        let _ = io::stdout().flush();
    }

    fn end_answer(&self) {
        println!();
    }

    fn background_result(&self, task: &str, answer: &str) {
        println!();
        Self::banner(&format!("🕒 Background result (task: {task})"));
        println!("{}", "ASSISTANT:".bright_magenta().bold());
        for line in answer.lines() {
            println!("{}", line.bright_blue());
        }
        println!();
    }

    fn error(&self, message: &str) {
        println!("\n{}", "ASSISTANT:".bright_magenta().bold());
        println!("{}\n", message.red());
    }

    fn notice(&self, message: &str) {
        println!("{}", message.bright_black());
    }
}
