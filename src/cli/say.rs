//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use tracing::debug;

use crate::api::{Content, GenerateContentRequest};
use crate::core::app::SessionContext;
use crate::core::chat_stream::{ChatStreamService, StreamMessage, StreamParams};
use crate::core::message::{MessageId, Source};

/// Text printed after the reply for the sources it cited.
pub fn format_sources(sources: &[Source]) -> String {
    let mut out = String::new();
    if sources.is_empty() {
        return out;
    }
    out.push_str("\nSources:\n");
    for (index, source) in sources.iter().enumerate() {
        out.push_str(&format!("  {}. {} <{}>\n", index + 1, source.title, source.uri));
    }
    out
}

pub async fn run_say(prompt: Vec<String>, session: SessionContext) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: geminal say <prompt>");
        std::process::exit(1);
    }

    let settings = &session.settings;
    let request = GenerateContentRequest::new(
        vec![Content::user(prompt.trim())],
        &settings.system_prompt,
        Some(settings.temperature),
        settings.search,
    );
    let stream_id = MessageId::new(1);
    let params = StreamParams {
        client: session.client.clone(),
        base_url: session.base_url.clone(),
        api_key: session.api_key.clone(),
        model: session.model.clone(),
        request,
        stream_id,
    };

    let (stream_service, mut rx) = ChatStreamService::new();
    stream_service.spawn_stream(params);
    debug!(model = %session.model, "say request sent");

    let mut sources: Vec<Source> = Vec::new();
    let mut stdout = io::stdout();
    loop {
        match rx.recv().await {
            Some((StreamMessage::Chunk(content), _)) => {
                print!("{content}");
                stdout.flush()?;
            }
            Some((StreamMessage::Sources(found), _)) => {
                for source in found {
                    if !sources.iter().any(|known| known.uri == source.uri) {
                        sources.push(source);
                    }
                }
            }
            Some((StreamMessage::Error(err), _)) => {
                eprintln!("\n\n❌ Error: {err}");
                std::process::exit(1);
            }
            Some((StreamMessage::End, _)) | None => {
                println!();
                break;
            }
        }
    }

    print!("{}", format_sources(&sources));
    stdout.flush()?;
    Ok(())
}
