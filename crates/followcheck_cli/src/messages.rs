//! Localized strings for the analysis summary.
//!
//! The analyzer itself is language-agnostic; only the summary the CLI
//! prints honors the stored preference.

use followcheck::Language;

pub(crate) struct Messages {
    pub completed: &'static str,
    pub followers: &'static str,
    pub following: &'static str,
    pub mutual: &'static str,
    pub following_only: &'static str,
    pub follower_only: &'static str,
    pub analyzed_at: &'static str,
    pub none_in_category: &'static str,
}

const EN: Messages = Messages {
    completed: "Analysis complete for @{login}",
    followers: "Followers",
    following: "Following",
    mutual: "Mutual",
    following_only: "Following only",
    follower_only: "Follower only",
    analyzed_at: "Analyzed at",
    none_in_category: "(none)",
};

const KO: Messages = Messages {
    completed: "@{login} 팔로워 관계 분석 완료",
    followers: "팔로워",
    following: "팔로잉",
    mutual: "상호 팔로우",
    following_only: "나만 팔로우",
    follower_only: "상대만 팔로우",
    analyzed_at: "분석 완료",
    none_in_category: "(없음)",
};

pub(crate) fn for_language(language: Language) -> &'static Messages {
    match language {
        Language::En => &EN,
        Language::Ko => &KO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_languages_resolve() {
        assert_eq!(for_language(Language::En).followers, "Followers");
        assert_eq!(for_language(Language::Ko).followers, "팔로워");
    }

    #[test]
    fn completed_template_carries_the_login_placeholder() {
        assert!(for_language(Language::En).completed.contains("{login}"));
        assert!(for_language(Language::Ko).completed.contains("{login}"));
    }
}
