//! Course chats are named like `[F24] Software Architecture / Архитектура ПО`.
//!
//! The course title is pulled out by a fixed sequence of rules, each one
//! working on what the previous one left: drop the semester prefix, cut the
//! secondary-language title, drop a trailing `Students` word, drop a trailing
//! parenthetical.

use regex::Regex;
use std::sync::LazyLock;

/// Leading `[TAG]`. Only the first bracket group counts.
static SEMESTER_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(?P<tag>[^\]]*)\]").unwrap());

const STUDENTS_TOKEN: &str = "Students";

/// Human readable course title, or the name untouched when it has no
/// semester prefix.
pub fn get_course_name(chat_name: &str) -> String {
    let Some(title) = strip_semester_prefix(chat_name) else {
        return chat_name.to_string();
    };

    let title = strip_secondary_title(title);
    let title = strip_students_suffix(title);
    let title = strip_trailing_parenthetical(title);

    title.trim().to_string()
}

/// Semester tag with its first letter capitalized, e.g. `[s23]` gives `S23`.
///
/// An empty tag (`[] Name`) is still a tag and gives an empty string.
pub fn get_semester(chat_name: &str) -> Option<String> {
    let captures = SEMESTER_PREFIX_REGEX.captures(chat_name)?;
    let tag = captures
        .name("tag")?
        .as_str()
        .trim_matches(|c| c == '[' || c == ']' || c == ' ');

    let mut chars = tag.chars();
    let semester = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    Some(semester)
}

fn strip_semester_prefix(chat_name: &str) -> Option<&str> {
    let prefix = SEMESTER_PREFIX_REGEX.find(chat_name)?;
    let title = chat_name[prefix.end()..].trim_start();

    match title.chars().next() {
        None | Some('/') => None,
        Some(_) => Some(title),
    }
}

fn strip_secondary_title(title: &str) -> &str {
    match title.split_once('/') {
        Some((primary, _)) => primary.trim_end(),
        None => title.trim_end(),
    }
}

fn strip_students_suffix(title: &str) -> &str {
    match title.rsplit_once(char::is_whitespace) {
        Some((rest, STUDENTS_TOKEN)) => rest.trim_end(),
        _ => title,
    }
}

/// Removes the one balanced `(...)` group that closes the title.
fn strip_trailing_parenthetical(title: &str) -> &str {
    if !title.ends_with(')') {
        return title;
    }

    let mut depth = 0usize;
    for (idx, ch) in title.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return title[..idx].trim_end();
                }
            }
            _ => {}
        }
    }

    // unbalanced, leave it alone
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_semester_prefix() {
        assert_eq!(strip_semester_prefix("[S24] Databases"), Some("Databases"));
        assert_eq!(
            strip_semester_prefix("[S23]Theoretical Sports"),
            Some("Theoretical Sports")
        );
        assert_eq!(strip_semester_prefix("No Brackets Here"), None);
        assert_eq!(strip_semester_prefix("[S24]"), None);
        assert_eq!(strip_semester_prefix("[S24]   "), None);
        assert_eq!(strip_semester_prefix("[S24] / Базы данных"), None);
        assert_eq!(strip_semester_prefix(" [S24] Databases"), None);
    }

    #[test]
    fn test_strip_secondary_title() {
        assert_eq!(
            strip_secondary_title("Information Retrieval / Информационный поиск"),
            "Information Retrieval"
        );
        assert_eq!(strip_secondary_title("Databases  "), "Databases");
        assert_eq!(
            strip_secondary_title("History / История (история России) Students"),
            "History"
        );
    }

    #[test]
    fn test_strip_students_suffix() {
        assert_eq!(strip_students_suffix("Networks Students"), "Networks");
        assert_eq!(strip_students_suffix("Networks  Students"), "Networks");
        assert_eq!(strip_students_suffix("NetworksStudents"), "NetworksStudents");
        assert_eq!(strip_students_suffix("Students"), "Students");
        assert_eq!(
            strip_students_suffix("Students of Networks"),
            "Students of Networks"
        );
    }

    #[test]
    fn test_strip_trailing_parenthetical() {
        assert_eq!(
            strip_trailing_parenthetical("Math Analysis II (Discussions)"),
            "Math Analysis II"
        );
        assert_eq!(strip_trailing_parenthetical("Physics (A) (B)"), "Physics (A)");
        assert_eq!(strip_trailing_parenthetical("Logic (a (b))"), "Logic");
        assert_eq!(strip_trailing_parenthetical("Odd b)"), "Odd b)");
        assert_eq!(
            strip_trailing_parenthetical("Physics (A) Lab"),
            "Physics (A) Lab"
        );
    }

    #[test]
    fn test_rule_order_matters() {
        // Students goes before the parenthetical is looked at
        assert_eq!(
            get_course_name("[F23] Philosophy II (Introduction to AI) Students"),
            "Philosophy II"
        );
        // secondary title goes before Students is looked at
        assert_eq!(
            get_course_name("[Sum23] History / История (история России, всеобщая история) Students"),
            "History"
        );
    }

    #[test]
    fn test_course_name_unmatched_is_returned_as_is() {
        assert_eq!(get_course_name("No Brackets Here"), "No Brackets Here");
        assert_eq!(get_course_name(""), "");
        assert_eq!(get_course_name("[S24]"), "[S24]");
    }

    #[test]
    fn test_course_name_only_first_bracket_group_is_a_tag() {
        assert_eq!(get_course_name("[S24] [Lab] Databases"), "[Lab] Databases");
        assert_eq!(get_semester("[S24] [Lab] Databases").as_deref(), Some("S24"));
    }

    #[test]
    fn test_semester() {
        let cases = [
            ("[Sum24] MLOps Engineering", Some("Sum24")),
            ("[s23] Linear Algebra II", Some("S23")),
            ("[F24] Information Retrieval", Some("F24")),
            ("[ f22 ] AGLA I", Some("F22")),
            ("[sUM24] Practicum Project", Some("SUM24")),
            ("[] Nothing", Some("")),
            ("[  ] Nothing", Some("")),
            ("No Brackets Here", None),
            ("Databases [S24]", None),
        ];

        for (input, expected) in cases {
            assert_eq!(get_semester(input).as_deref(), expected, "{input}");
        }
    }
}
