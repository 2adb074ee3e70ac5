use crate::core::config::data::Config;

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: {} (default)", self.model_or_default()),
        }
        match self.temperature {
            Some(temperature) => println!("  temperature: {temperature}"),
            None => println!("  temperature: {} (default)", self.temperature_or_default()),
        }
        println!("  search: {}", on_off(self.search_enabled()));
        println!("  syntax: {}", on_off(self.syntax_enabled()));
        println!("  base-url: {}", self.base_url_or_default());
        match &self.system_prompt {
            Some(prompt) if prompt.trim().is_empty() => println!("  system-prompt: (disabled)"),
            Some(prompt) => println!("  system-prompt: {}", summarize(prompt)),
            None => println!("  system-prompt: (default)"),
        }
        match self.greeting_or_default() {
            Some(_) if self.greeting.is_none() => println!("  greeting: (default)"),
            Some(greeting) => println!("  greeting: {}", summarize(greeting)),
            None => println!("  greeting: (disabled)"),
        }
    }
}

fn summarize(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let mut summary: String = first_line.chars().take(60).collect();
    if summary.len() < text.len() {
        summary.push('…');
    }
    summary
}
