use llmgateway_domain::ChatCompletionResponse;

/// Outcome of a chat completion call: a single answer when the request did
/// not ask for streaming, otherwise a lazy sequence of chunks.
pub enum Completion<S> {
    Response(ChatCompletionResponse),
    Stream(S),
}

impl<S> Completion<S> {
    pub fn is_stream(&self) -> bool {
        matches!(self, Completion::Stream(_))
    }

    pub fn into_response(self) -> Option<ChatCompletionResponse> {
        match self {
            Completion::Response(response) => Some(response),
            Completion::Stream(_) => None,
        }
    }

    pub fn into_stream(self) -> Option<S> {
        match self {
            Completion::Stream(stream) => Some(stream),
            Completion::Response(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_response_variant() {
        let fixture: Completion<()> = Completion::Response(ChatCompletionResponse::new("hi"));

        assert!(!fixture.is_stream());
        assert_eq!(fixture.into_response(), Some(ChatCompletionResponse::new("hi")));
    }

    #[test]
    fn test_stream_variant() {
        let fixture = Completion::Stream(vec![1, 2]);

        assert!(fixture.is_stream());
        assert_eq!(fixture.into_stream(), Some(vec![1, 2]));
    }
}
