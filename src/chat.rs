//! FAQ-backed chat stub.
//!
//! Answers a visitor question from the configured FAQ using fuzzy matching,
//! then falls back to a few keyword-triggered canned replies built from the
//! site profile.

use anyhow::{bail, Result};

use crate::fuzzy::Matcher;
use crate::models::{FaqItem, SiteProfile};

pub const FAQ_THRESHOLD: f64 = 0.4;

pub fn greeting(profile: &SiteProfile) -> String {
    let name = display_name(profile);
    format!(
        "Hi! I'm here to help answer questions about {} and their work. Ask me anything!",
        name
    )
}

/// Best reply for `question`. Errors only on a blank question.
pub fn answer(question: &str, faq: &[FaqItem], profile: &SiteProfile) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        bail!("message must not be empty");
    }

    let matcher = Matcher::new(&[("question", 1.0), ("answer", 1.0)], FAQ_THRESHOLD);
    let hits = matcher.search(faq, question, |item| {
        vec![vec![item.question.as_str()], vec![item.answer.as_str()]]
    });
    if let Some(best) = hits.first() {
        return Ok(faq[best.index].answer.clone());
    }

    Ok(fallback(&question.to_lowercase(), profile))
}

fn display_name(profile: &SiteProfile) -> &str {
    if profile.name.is_empty() {
        "the site owner"
    } else {
        &profile.name
    }
}

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

fn fallback(lower: &str, profile: &SiteProfile) -> String {
    let name = display_name(profile);

    if mentions(lower, &["email", "contact"]) && !profile.email.is_empty() {
        return format!(
            "You can reach {} at {}. Feel free to connect on LinkedIn as well!",
            name, profile.email
        );
    }
    if mentions(lower, &["location", "where"]) && !profile.location.is_empty() {
        return format!("{} is based in {}.", name, profile.location);
    }
    if mentions(lower, &["project", "work"]) {
        return format!(
            "{} has worked on several security projects. Check out the Projects section to learn more!",
            name
        );
    }
    if mentions(lower, &["skill", "expertise"]) {
        return format!(
            "{} specializes in security tooling, threat research, product security, and secure workflows.",
            name
        );
    }

    format!(
        "I'm not sure about that. Try asking about {}'s projects, skills, contact information, or check the FAQ section for more details!",
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq() -> Vec<FaqItem> {
        vec![
            FaqItem {
                id: "1".into(),
                question: "Are you open to collaborations or part-time work?".into(),
                answer: "Yes, reach out via email.".into(),
            },
            FaqItem {
                id: "2".into(),
                question: "How do I start a project with you?".into(),
                answer: "Send a short brief.".into(),
            },
        ]
    }

    fn profile() -> SiteProfile {
        SiteProfile {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            location: "Lisbon".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_faq_match() {
        let reply = answer("collaborations", &faq(), &profile()).unwrap();
        assert_eq!(reply, "Yes, reach out via email.");
    }

    #[test]
    fn test_location_fallback() {
        let reply = answer("where are u?", &[], &profile()).unwrap();
        assert_eq!(reply, "Jane is based in Lisbon.");
    }

    #[test]
    fn test_generic_fallback() {
        let reply = answer("zzz", &[], &profile()).unwrap();
        assert!(reply.starts_with("I'm not sure"));
    }

    #[test]
    fn test_blank_rejected() {
        assert!(answer("   ", &faq(), &profile()).is_err());
    }
}
