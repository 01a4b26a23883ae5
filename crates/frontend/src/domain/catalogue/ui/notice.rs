use crate::domain::catalogue::sync::MutationOutcome;

/// Строка уведомления под заголовком
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub ok: bool,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: text.into(),
        }
    }

    pub fn from_outcome<T>(outcome: &MutationOutcome<T>) -> Self {
        if !outcome.success {
            return Self::error(
                outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "Operation failed".to_string()),
            );
        }
        let mut text = outcome.message.clone().unwrap_or_else(|| "Done".to_string());
        if outcome.is_local {
            text.push_str(" [local only]");
        }
        Self { ok: true, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(success: bool, is_local: bool) -> MutationOutcome<()> {
        MutationOutcome {
            success,
            data: None,
            error: (!success).then(|| "Site 7 not found".to_string()),
            message: success.then(|| "Site \"A\" deleted".to_string()),
            is_local,
        }
    }

    #[test]
    fn test_from_outcome() {
        assert_eq!(
            Notice::from_outcome(&outcome(true, false)),
            Notice {
                ok: true,
                text: "Site \"A\" deleted".into()
            }
        );
        assert!(Notice::from_outcome(&outcome(true, true))
            .text
            .ends_with("[local only]"));
        assert_eq!(
            Notice::from_outcome(&outcome(false, false)),
            Notice::error("Site 7 not found")
        );
    }
}
