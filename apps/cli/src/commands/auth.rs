//! `shelfbook login`: checks the demo credential pair.
//!
//! Nothing is unlocked by a successful login and no session is kept. A
//! failed check exits with status 1.

use serde_json::json;
use tracing::warn;

use shelfbook_core::DemoCredentials;

use super::{Output, Prompt};
use crate::cli::LoginArgs;
use crate::error::ApiResult;

pub fn login(
    args: LoginArgs,
    credentials: &DemoCredentials,
    prompt: &mut dyn Prompt,
) -> ApiResult<Output> {
    let password = match args.password {
        Some(password) => password,
        None => prompt.ask("Password: ")?,
    };
    let password = password.trim_end_matches(['\r', '\n']);

    if credentials.verify(&args.username, password) {
        Ok(Output::new(
            format!("Welcome, {}", args.username),
            json!({ "authenticated": true, "username": args.username }),
        ))
    } else {
        warn!(username = %args.username, "Demo login rejected");
        Ok(Output::new(
            "Invalid username or password",
            json!({ "authenticated": false, "username": args.username }),
        )
        .failed(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::ScriptedPrompt;

    fn args(username: &str, password: Option<&str>) -> LoginArgs {
        LoginArgs {
            username: username.to_string(),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_login_with_flag() {
        let mut prompt = ScriptedPrompt::default();
        let out = login(args("admin", Some("password")), &DemoCredentials::default(), &mut prompt)
            .unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.json["authenticated"], true);
        assert!(prompt.asked.is_empty());
    }

    #[test]
    fn test_login_prompts_for_password() {
        let mut prompt = ScriptedPrompt::answering(&["password\n"]);
        let out = login(args("admin", None), &DemoCredentials::default(), &mut prompt).unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(prompt.asked, vec!["Password: "]);
    }

    #[test]
    fn test_login_rejected() {
        let mut prompt = ScriptedPrompt::default();
        let out = login(args("admin", Some("Password")), &DemoCredentials::default(), &mut prompt)
            .unwrap();
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.text, "Invalid username or password");
    }

    #[test]
    fn test_configured_pair() {
        let creds = DemoCredentials::new("clerk", "s3cret");
        let mut prompt = ScriptedPrompt::default();
        let out = login(args("clerk", Some("s3cret")), &creds, &mut prompt).unwrap();
        assert_eq!(out.text, "Welcome, clerk");
    }
}
