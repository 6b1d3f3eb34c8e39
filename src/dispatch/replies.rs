//! Static reply table — the coach's canned content.
//!
//! Rule order is load-bearing: matching is first-hit-wins, so the
//! specific career keywords are declared before the broad greeting
//! keywords (e.g. "Hi, resume help?" should hit the resume rule).

use rand::seq::SliceRandom;

use crate::dispatch::types::{Action, Button, ReplyRule};

/// Fallback for non-text messages (images, stickers, audio).
pub const NON_TEXT_FALLBACK: &str =
    "I can only respond to text right now. Type a career question and I'll jump in!";

/// Static fallback for unmatched text (and for provider failures).
pub const DEFAULT_REPLY: &str = "Thanks for reaching out! 😊\n\n\
I'm Coach Alex, your AI career advisor. I can help with:\n\n\
• 🎯 Career planning & goals\n\
• 📝 Resume & interview tips\n\
• 💰 Salary negotiation\n\
• 📈 Skill development\n\
• 🔍 Job search strategies\n\n\
What career topic can I help you with today?";

pub const RESUME_TIPS: &str = "📝 *Resume Tips:*\n\n\
✅ Keep it 1-2 pages maximum\n\
✅ Use action verbs (Led, Created, Improved)\n\
✅ Quantify achievements with numbers\n\
✅ Tailor keywords to job descriptions\n\
✅ Professional email & clean formatting\n\n\
*What field are you in?* I can give more specific advice! 🎯";

pub const INTERVIEW_TIPS: &str = "🎤 *Interview Success:*\n\n\
✅ Research the company thoroughly\n\
✅ Practice STAR method responses\n\
✅ Prepare thoughtful questions\n\
✅ Dress appropriately\n\
✅ Send thank you email within 24hrs\n\n\
*What type of interview?* Phone, video, or in-person? 🤔";

pub const SALARY_TIPS: &str = "💰 *Salary Negotiation:*\n\n\
✅ Research market rates first\n\
✅ Know your value & achievements\n\
✅ Let them make the first offer\n\
✅ Negotiate total compensation package\n\
✅ Stay professional and positive\n\n\
*Current situation?* New job offer or asking for a raise? 📊";

const GOALS_REPLY: &str = "🎯 *Career Goal Setting:*\n\n\
Let's create your career roadmap! Tell me:\n\
• What's your current role?\n\
• Where do you want to be in 2-5 years?\n\
• What's most important to you?\n\
• What's your biggest challenge?\n\n\
The more specific, the better I can help! 🚀";

const JOBS_REPLY: &str = "🔍 *Job Search Strategy:*\n\n\
Job hunting can be tough! Tell me:\n\
• What roles are you targeting?\n\
• How long have you been searching?\n\
• What methods are you using?\n\
• What's been your biggest obstacle?\n\n\
Let's create a winning plan! 💪";

const PING_REPLY: &str = "🎉 *Webhook Working!*\n\n\
✅ Two-way communication active!\n\n\
I'm Coach Alex, ready to help with your career! 💼";

const WELCOME_MESSAGES: &[&str] = &[
    "Hello! I'm Coach Alex, your AI Career Advisor! 🚀\nHow can I help boost your career today?",
    "Hi there! Ready to level up your career? 💼\nWhat's your biggest career question right now?",
    "Welcome! I'm here to help with all things career-related! 🎯\nWhat would you like to discuss?",
];

/// Persona prompt for generative replies.
pub const COACH_SYSTEM_PROMPT: &str = "You are Coach Alex, a friendly and practical AI career \
advisor chatting over WhatsApp. Keep replies short (under 120 words), concrete, and encouraging. \
Stay focused on career topics: resumes, interviews, salary, skills, job search, and professional \
growth. End with one specific follow-up question.";

/// Prompt context for career-keyword messages forwarded to the provider.
const CAREER_PROMPT_CONTEXT: &str =
    "The user is asking for career advice. Give practical, specific guidance.";

/// Fresh welcome menu content: a rotating greeting plus the topic
/// buttons. Called once per send so the greeting actually rotates.
pub fn welcome_menu() -> (String, Vec<Button>) {
    let body = WELCOME_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(WELCOME_MESSAGES[0]);
    (
        body.to_string(),
        vec![
            Button::new("goals", "🎯 Career Goals"),
            Button::new("resume", "📝 Resume Tips"),
            Button::new("jobs", "🔍 Job Search"),
        ],
    )
}

/// The coach's rule table, in match priority order.
pub fn default_rules() -> Vec<ReplyRule> {
    vec![
        ReplyRule::new(&["resume", "cv"], Action::SendText(RESUME_TIPS.into())),
        ReplyRule::new(&["interview"], Action::SendText(INTERVIEW_TIPS.into())),
        ReplyRule::new(
            &["salary", "negotiat"],
            Action::SendText(SALARY_TIPS.into()),
        ),
        ReplyRule::new(&["ping", "webhook"], Action::SendText(PING_REPLY.into())),
        ReplyRule::new(&["hi", "hello", "hey", "start"], Action::SendWelcome),
        ReplyRule::new(
            &["job", "career", "work", "skills", "promotion"],
            Action::ForwardToProvider {
                prompt_context: CAREER_PROMPT_CONTEXT.into(),
            },
        ),
    ]
}

/// Reply for an interactive button press, keyed by button id.
/// Unknown ids get a generic nudge rather than an error.
pub fn button_reply_action(button_id: &str) -> Action {
    let body = match button_id {
        "goals" => GOALS_REPLY,
        "resume" => RESUME_TIPS,
        "jobs" => JOBS_REPLY,
        _ => "Great choice! Tell me more about what you need help with! 🤔",
    };
    Action::SendText(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_rule_declared_before_greetings() {
        let rules = default_rules();
        let resume_pos = rules
            .iter()
            .position(|r| r.keywords.contains(&"resume".to_string()))
            .unwrap();
        let greeting_pos = rules
            .iter()
            .position(|r| r.keywords.contains(&"hi".to_string()))
            .unwrap();
        assert!(resume_pos < greeting_pos);
    }

    #[test]
    fn welcome_menu_has_three_buttons() {
        let (_, buttons) = welcome_menu();
        assert_eq!(buttons.len(), 3);
        assert_eq!(buttons[0].id, "goals");
        assert_eq!(buttons[1].id, "resume");
        assert_eq!(buttons[2].id, "jobs");
    }

    #[test]
    fn greeting_rule_defers_welcome_resolution() {
        let rules = default_rules();
        let greeting = rules
            .iter()
            .find(|r| r.keywords.contains(&"hi".to_string()))
            .unwrap();
        assert_eq!(greeting.action, Action::SendWelcome);
    }

    #[test]
    fn welcome_greeting_rotates_across_sends() {
        let bodies: std::collections::HashSet<String> =
            (0..64).map(|_| welcome_menu().0).collect();
        assert!(bodies.len() > 1, "greeting should not be frozen");
    }

    #[test]
    fn button_reply_known_ids() {
        assert_eq!(button_reply_action("goals"), Action::SendText(GOALS_REPLY.into()));
        assert_eq!(
            button_reply_action("resume"),
            Action::SendText(RESUME_TIPS.into())
        );
        assert_eq!(button_reply_action("jobs"), Action::SendText(JOBS_REPLY.into()));
    }

    #[test]
    fn button_reply_unknown_id_gets_nudge() {
        let Action::SendText(body) = button_reply_action("mystery") else {
            panic!("expected text action");
        };
        assert!(body.contains("Tell me more"));
    }
}
