use std::io::{self, Write};

use colored::Colorize;
use llmgateway_client::{ChatCompletionResponse, ModelList};
use serde_json::{Map, Value};

pub(crate) fn write_health(out: &mut impl Write, health: Map<String, Value>) -> io::Result<()> {
    let pretty = serde_json::to_string_pretty(&Value::Object(health)).map_err(io::Error::other)?;
    writeln!(out, "{pretty}")
}

pub(crate) fn write_models(out: &mut impl Write, models: &ModelList) -> io::Result<()> {
    for model in models.iter() {
        writeln!(out, "{} {}", model.id.as_str().bold(), model.name)?;
    }
    Ok(())
}

pub(crate) fn write_response(out: &mut impl Write, response: &ChatCompletionResponse) -> io::Result<()> {
    writeln!(out, "{} {}", "Assistant:".green(), response.message)
}

/// Writes one streamed chunk and flushes so it shows up immediately.
pub(crate) fn write_chunk(out: &mut impl Write, chunk: &ChatCompletionResponse) -> io::Result<()> {
    write!(out, "{}", chunk.message)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_health() {
        let health = json!({"status": "ok"}).as_object().unwrap().clone();

        let actual = render(|out| write_health(out, health));
        assert_eq!(actual, "{\n  \"status\": \"ok\"\n}\n");
    }

    #[test]
    fn test_write_chunks_without_separator() {
        let actual = render(|out| {
            write_chunk(out, &ChatCompletionResponse::new("Hel"))?;
            write_chunk(out, &ChatCompletionResponse::new("lo"))
        });
        assert_eq!(actual, "Hello");
    }

    #[test]
    fn test_write_response() {
        let actual = render(|out| write_response(out, &ChatCompletionResponse::new("Hi there")));
        assert_eq!(actual, "Assistant: Hi there\n");
    }
}
