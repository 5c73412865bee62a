//! Message composition module
//!
//! Pure functions only: mapping days-remaining to a tiered countdown
//! message, the fixed reply texts, and MarkdownV2 escaping. Everything
//! returned here is already escaped and safe to send with
//! `ParseMode::MarkdownV2`.

use chrono::NaiveDate;

/// Characters reserved by Telegram MarkdownV2 that must be backslash-escaped
/// in literal text.
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape MarkdownV2 reserved characters without double-escaping.
///
/// A reserved character already preceded by a backslash is left alone, so
/// pre-escaped fragments survive intact. Multi-byte text and emoji pass
/// through unchanged.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut escaped = false;

    for ch in text.chars() {
        if escaped {
            out.push(ch);
            escaped = false;
            continue;
        }
        if ch == '\\' {
            out.push(ch);
            escaped = true;
            continue;
        }
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }

    out
}

/// Compose the daily countdown message for a number of whole days left.
///
/// Bands are checked in ascending order of `days_left`. Negative values
/// get a dedicated overdue tone: the job keeps firing after the deadline
/// passes until a new date replaces it, and claiming "today is the
/// deadline" on those fires would be wrong.
pub fn compose(days_left: i64) -> String {
    let body = if days_left < 0 {
        let overdue = days_left.unsigned_abs();
        let unit = if overdue == 1 { "day" } else { "days" };
        format!(
            "⏰⏰ DEADLINE PASSED! ⏰⏰\n\n\
             💀 You are {overdue} {unit} overdue! 💀\n\
             ▪️ The countdown hit zero and kept going!\n\
             ▪️ Send a new date (YYYY-MM-DD) to reset it!"
        )
    } else if days_left == 0 {
        "🚨🚨🚨 TODAY IS THE DEADLINE! 🚨🚨🚨\n\n\
         🔥 DROP EVERYTHING AND FINISH! 🔥\n\
         ▪️ No procrastination!\n\
         ▪️ No excuses!\n\
         ▪️ Just GET IT DONE! ✅"
            .to_string()
    } else if days_left == 1 {
        "⚠️⚠️ ONE DAY LEFT! ⚠️⚠️\n\n\
         ⏰ FINAL PUSH! ⏰\n\
         ▪️ Review everything!\n\
         ▪️ Fix last-minute issues!\n\
         ▪️ You're almost there! 💪"
            .to_string()
    } else if days_left <= 3 {
        format!(
            "🔔 {days_left} DAYS LEFT! 🔔\n\n\
             ❗ Urgent Action Needed! ❗\n\
             ▪️ Prioritize critical tasks!\n\
             ▪️ No distractions!\n\
             ▪️ Stay focused! 🎯"
        )
    } else if days_left <= 7 {
        format!(
            "🔥🔥🔥 {days_left} DAYS LEFT! 🔥🔥🔥\n\n\
             🚨 TIME IS RUNNING OUT! 🚨\n\
             ⚠️ NO ROOM FOR MISTAKES! ⚠️\n\
             🔥 WORK FAST! WORK SMART! 🔥\n\
             ⏳ EVERY SECOND COUNTS! ⏳"
        )
    } else if days_left <= 14 {
        format!(
            "⚠️⚠️⚠️ {days_left} DAYS REMAINING! ⚠️⚠️⚠️\n\n\
             🟠 ENTERING THE DANGER ZONE! 🟠\n\
             🔥 DON'T GET COMPLACENT! 🔥\n\
             ⏳ THE CLOCK IS MERCILESS! ⏳\n\
             🚀 KEEP UP THE PACE! 🚀"
        )
    } else {
        format!(
            "🗓 {days_left} days to go.\n\n\
             🙂 Still plenty of runway.\n\
             ▪️ Keep a steady pace and you'll make it comfortably.\n\
             ⏳ I'll check in every day as the date gets closer."
        )
    };

    escape_markdown_v2(&body)
}

/// One-time onboarding prompt sent when the bot joins a group with no
/// stored deadline.
pub fn onboarding_prompt() -> String {
    escape_markdown_v2(
        "🎉 Welcome to Deadline Countdown Bot! 🎉\n\n\
         📅 To get started, send me your deadline in this format:\n\
         YYYY-MM-DD\n\n\
         Example: 2025-12-31\n\n\
         ⏳ I'll send daily reminders to keep everyone on track! 🚀",
    )
}

/// Confirmation reply after a deadline was accepted and scheduled.
///
/// `fire_time` is the rendered schedule (e.g. "07:00 UTC") taken from the
/// live configuration, so the stated reminder time always matches the
/// actual trigger.
pub fn confirmation(deadline_date: NaiveDate, days_left: i64, fire_time: &str) -> String {
    escape_markdown_v2(&format!(
        "✅ Deadline Set! ✅\n\n\
         🗓 Date: {deadline_date}\n\
         ⏳ Days Left: {days_left}\n\n\
         📢 Daily reminders will arrive at {fire_time}! ⏰"
    ))
}

/// Reply for text that does not parse as a YYYY-MM-DD date.
pub fn format_error() -> String {
    escape_markdown_v2(
        "❌ Invalid Format!\n\
         Please use YYYY-MM-DD (e.g., 2025-12-31).",
    )
}

/// Reply for a syntactically valid date that is strictly in the past.
pub fn date_passed() -> String {
    escape_markdown_v2(
        "❌ That date has already passed!\n\
         Set a future date like 2025-12-31.",
    )
}

/// Generic reply when the deadline could not be persisted.
pub fn storage_failure() -> String {
    escape_markdown_v2(
        "⚠️ Something went wrong saving your deadline.\n\
         Nothing was changed. Please try again in a moment.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Scan for a reserved character that is not covered by a backslash.
    fn has_bare_reserved(text: &str) -> bool {
        let mut escaped = false;
        for ch in text.chars() {
            if escaped {
                escaped = false;
                continue;
            }
            if ch == '\\' {
                escaped = true;
                continue;
            }
            if RESERVED.contains(&ch) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_markdown_v2("hello world"), "hello world");
        assert_eq!(escape_markdown_v2(""), "");
    }

    #[test]
    fn test_escape_each_reserved_char_once() {
        for &ch in RESERVED {
            let escaped = escape_markdown_v2(&ch.to_string());
            assert_eq!(escaped, format!("\\{ch}"));
        }
    }

    #[test]
    fn test_escape_does_not_double_escape() {
        assert_eq!(escape_markdown_v2(r"\."), r"\.");
        assert_eq!(escape_markdown_v2(r"a\!b"), r"a\!b");
        // A second pass escapes the backslash itself, so callers must
        // escape exactly once; already-escaped chars stay single-escaped.
        assert_eq!(escape_markdown_v2(r"pre\-escaped."), r"pre\-escaped\.");
    }

    #[test]
    fn test_escape_preserves_emoji() {
        assert_eq!(escape_markdown_v2("🚨 alert 🚨"), "🚨 alert 🚨");
        assert_eq!(escape_markdown_v2("дедлайн"), "дедлайн");
    }

    #[test]
    fn test_compose_exact_bands_are_distinct() {
        let today = compose(0);
        let one_day = compose(1);
        assert!(today.contains("TODAY IS THE DEADLINE"));
        assert!(one_day.contains("ONE DAY LEFT"));
        assert_ne!(today, one_day);
    }

    #[test]
    fn test_compose_urgent_band() {
        for days in [2, 3] {
            assert!(compose(days).contains("Urgent Action Needed"), "{days}");
        }
        assert!(!compose(4).contains("Urgent Action Needed"));
    }

    #[test]
    fn test_compose_high_alert_band() {
        for days in [4, 5, 6, 7] {
            assert!(compose(days).contains("TIME IS RUNNING OUT"), "{days}");
        }
        assert!(!compose(8).contains("TIME IS RUNNING OUT"));
    }

    #[test]
    fn test_compose_elevated_band() {
        for days in [8, 11, 14] {
            assert!(compose(days).contains("DANGER ZONE"), "{days}");
        }
        assert!(!compose(15).contains("DANGER ZONE"));
    }

    #[test]
    fn test_compose_long_range_band() {
        for days in [15, 30, 365] {
            assert!(compose(days).contains("days to go"), "{days}");
        }
    }

    #[test]
    fn test_compose_overdue_band() {
        assert!(compose(-1).contains("1 day overdue"));
        assert!(compose(-5).contains("5 days overdue"));
        assert!(!compose(0).contains("overdue"));
    }

    #[test]
    fn test_all_replies_are_markdown_safe() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        for text in [
            compose(-3),
            compose(0),
            compose(5),
            compose(20),
            onboarding_prompt(),
            confirmation(today, 42, "07:00 UTC"),
            format_error(),
            date_passed(),
            storage_failure(),
        ] {
            assert!(!has_bare_reserved(&text), "bare reserved char in {text:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_escape_neutralizes_all_reserved(text in "[^\\\\]*") {
            let escaped = escape_markdown_v2(&text);
            prop_assert!(!has_bare_reserved(&escaped));
        }

        #[test]
        fn prop_escape_preserves_content(text in "[a-zA-Z0-9 \u{1F600}-\u{1F64F}]*") {
            // No reserved characters and no backslashes: identity.
            prop_assert_eq!(escape_markdown_v2(&text), text);
        }
    }
}
