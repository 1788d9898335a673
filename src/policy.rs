//! Bootstrap policy resolution.
//!
//! The policy decides what happens to an existing config file. It comes from
//! the `--config-policy` flag, then the `SYSGREET_CONFIG_POLICY` env var, and
//! only falls back to prompting when a human is at the terminal:
//!
//! ```text
//! flag (non-empty)                  → parse or fail
//! env  (non-empty)                  → parse or fail
//! explicit prompt, non-interactive  → PromptUnavailable
//! non-interactive                   → PolicyRequired
//! otherwise                         → prompt
//! ```
//!
//! Resolution is a pure function of its three inputs.

use std::fmt;
use std::str::FromStr;

use crate::error::SysgreetError;

/// What to do with an existing config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyValue {
    Keep,
    Overwrite,
    Prompt,
}

impl PolicyValue {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyValue::Keep => "keep",
            PolicyValue::Overwrite => "overwrite",
            PolicyValue::Prompt => "prompt",
        }
    }

    /// Parse a raw value where an empty string means "not provided".
    ///
    /// Returns `Ok(None)` for `""`, `Ok(Some(_))` for a recognized value, and
    /// `InvalidPolicy` for anything else (including whitespace-only input).
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, SysgreetError> {
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }
}

impl FromStr for PolicyValue {
    type Err = SysgreetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(PolicyValue::Keep),
            "overwrite" => Ok(PolicyValue::Overwrite),
            "prompt" => Ok(PolicyValue::Prompt),
            _ => Err(SysgreetError::InvalidPolicy { value: s.into() }),
        }
    }
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the effective policy came from. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    Flag,
    Env,
    Default,
}

impl fmt::Display for PolicySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PolicySource::Flag => "flag",
            PolicySource::Env => "env",
            PolicySource::Default => "default",
        })
    }
}

/// The evaluated policy. `Prompt` is only ever resolved with `interactive == true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyResolution {
    pub value: PolicyValue,
    pub source: PolicySource,
    pub interactive: bool,
}

/// Resolve the effective policy from flag, env, and interactivity.
pub fn resolve_policy(
    flag_value: &str,
    env_value: &str,
    interactive: bool,
) -> Result<PolicyResolution, SysgreetError> {
    let explicit = [(flag_value, PolicySource::Flag), (env_value, PolicySource::Env)];

    for (raw, source) in explicit {
        if let Some(value) = PolicyValue::parse_optional(raw)? {
            if value == PolicyValue::Prompt && !interactive {
                return Err(SysgreetError::PromptUnavailable);
            }
            return Ok(PolicyResolution {
                value,
                source,
                interactive,
            });
        }
    }

    if !interactive {
        return Err(SysgreetError::PolicyRequired);
    }

    Ok(PolicyResolution {
        value: PolicyValue::Prompt,
        source: PolicySource::Default,
        interactive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: [(&str, PolicyValue); 3] = [
        ("keep", PolicyValue::Keep),
        ("overwrite", PolicyValue::Overwrite),
        ("prompt", PolicyValue::Prompt),
    ];

    #[test]
    fn parse_is_trimmed_and_case_insensitive() {
        assert_eq!(" KEEP\n".parse::<PolicyValue>().unwrap(), PolicyValue::Keep);
        assert_eq!(
            "Overwrite".parse::<PolicyValue>().unwrap(),
            PolicyValue::Overwrite
        );
        assert_eq!("prompt".parse::<PolicyValue>().unwrap(), PolicyValue::Prompt);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "sometimes".parse::<PolicyValue>().unwrap_err();
        assert!(matches!(err, SysgreetError::InvalidPolicy { value } if value == "sometimes"));
    }

    #[test]
    fn empty_is_not_provided_but_blank_is_invalid() {
        assert_eq!(PolicyValue::parse_optional("").unwrap(), None);
        assert!(PolicyValue::parse_optional("   ").is_err());
    }

    #[test]
    fn flag_dominates_env_and_interactivity() {
        for (flag, expected) in VALUES {
            for env in ["", "keep", "overwrite", "prompt", "bogus"] {
                // Prompt cannot resolve without a terminal, so only check it interactively.
                let modes: &[bool] = if expected == PolicyValue::Prompt {
                    &[true]
                } else {
                    &[true, false]
                };
                for &interactive in modes {
                    let res = resolve_policy(flag, env, interactive).unwrap();
                    assert_eq!(res.value, expected, "flag={flag} env={env}");
                    assert_eq!(res.source, PolicySource::Flag);
                    assert_eq!(res.interactive, interactive);
                }
            }
        }
    }

    #[test]
    fn env_used_when_flag_empty() {
        let res = resolve_policy("", "overwrite", false).unwrap();
        assert_eq!(res.value, PolicyValue::Overwrite);
        assert_eq!(res.source, PolicySource::Env);
    }

    #[test]
    fn invalid_flag_fails_even_with_valid_env() {
        let err = resolve_policy("nope", "keep", true).unwrap_err();
        assert!(matches!(err, SysgreetError::InvalidPolicy { .. }));
    }

    #[test]
    fn invalid_env_fails() {
        let err = resolve_policy("", "maybe", true).unwrap_err();
        assert!(matches!(err, SysgreetError::InvalidPolicy { .. }));
    }

    #[test]
    fn non_interactive_without_policy_is_required_error() {
        let err = resolve_policy("", "", false).unwrap_err();
        assert!(matches!(err, SysgreetError::PolicyRequired));
    }

    #[test]
    fn interactive_without_policy_defaults_to_prompt() {
        let res = resolve_policy("", "", true).unwrap();
        assert_eq!(res.value, PolicyValue::Prompt);
        assert_eq!(res.source, PolicySource::Default);
        assert!(res.interactive);
    }

    #[test]
    fn prompt_never_resolves_non_interactively() {
        for (flag, env) in [("prompt", ""), ("", "prompt"), ("PROMPT", "keep")] {
            let result = resolve_policy(flag, env, false);
            assert!(
                matches!(result, Err(SysgreetError::PromptUnavailable)),
                "flag={flag} env={env}"
            );
        }
        assert!(matches!(
            resolve_policy("", "", false),
            Err(SysgreetError::PolicyRequired)
        ));
    }
}
