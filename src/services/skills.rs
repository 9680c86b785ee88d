use std::collections::BTreeSet;

const COURSE_SKILLS: &[(&[&str], &[&str])] = &[
    (&["django", "python"], &["Python", "Django", "Backend Development"]),
    (&["cardano", "blockchain"], &["Blockchain", "Cardano", "Smart Contracts"]),
    (&["web", "frontend"], &["Web Development", "HTML/CSS", "JavaScript"]),
];

const QUIZ_SKILLS: &[(&str, &str)] = &[
    ("api", "API Development"),
    ("database", "Database Design"),
    ("security", "Web Security"),
];

/// Skills backed by a finished course: keywords in the course title and in the titles
/// of passed quizzes, case-insensitive substring match. No duplicates.
pub fn derive_skills<'a, I>(course_title: &str, passed_quiz_titles: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut skills = BTreeSet::new();
    let title = course_title.to_lowercase();

    for (keywords, granted) in COURSE_SKILLS {
        if keywords.iter().any(|k| title.contains(k)) {
            skills.extend(granted.iter().copied());
        }
    }

    for quiz_title in passed_quiz_titles {
        let quiz_title = quiz_title.to_lowercase();
        for (keyword, skill) in QUIZ_SKILLS {
            if quiz_title.contains(keyword) {
                skills.insert(*skill);
            }
        }
    }

    skills.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn course_title_keywords() {
        let skills = derive_skills("Formation Django & Cardano", Vec::<&str>::new());
        for expected in ["Python", "Django", "Backend Development", "Blockchain", "Cardano"] {
            assert!(skills.iter().any(|s| s == expected), "missing {expected}");
        }
        assert!(!skills.iter().any(|s| s == "JavaScript"));
    }

    #[test]
    fn passed_quiz_titles_add_tags() {
        let skills = derive_skills("Intro", ["REST API basics", "Database SECURITY"]);
        assert_eq!(
            skills,
            vec!["API Development", "Database Design", "Web Security"]
        );
    }

    #[test]
    fn duplicates_are_removed() {
        let skills = derive_skills("Python and Django", ["API one", "api two"]);
        let api = skills.iter().filter(|s| *s == "API Development").count();
        let python = skills.iter().filter(|s| *s == "Python").count();
        assert_eq!(api, 1);
        assert_eq!(python, 1);
    }

    #[test]
    fn unrelated_titles_yield_nothing() {
        assert!(derive_skills("Cooking", ["Knife handling"]).is_empty());
    }
}
