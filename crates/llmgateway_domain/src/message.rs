use serde::{Deserialize, Serialize};

/// A single turn in a chat conversation.
///
/// The role is kept as a plain string because the gateway forwards it to the
/// upstream provider untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl ToString, content: impl ToString) -> Self {
        Self { role: role.to_string(), content: content.to_string() }
    }

    pub fn system(content: impl ToString) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl ToString) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl ToString) -> Self {
        Self::new("assistant", content)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_role_constructors() {
        assert_eq!(Message::system("a").role, "system");
        assert_eq!(Message::user("b").role, "user");
        assert_eq!(Message::assistant("c").role, "assistant");
    }

    #[test]
    fn test_message_requires_both_fields() {
        let actual = serde_json::from_value::<Message>(json!({"role": "user"}));
        assert!(actual.is_err());

        let actual = serde_json::from_value::<Message>(json!({"role": "user", "content": 1}));
        assert!(actual.is_err());
    }

    #[test]
    fn test_message_wire_shape() {
        let actual = serde_json::to_value(Message::user("Hello!")).unwrap();
        let expected = json!({"role": "user", "content": "Hello!"});
        assert_eq!(actual, expected);
    }
}
