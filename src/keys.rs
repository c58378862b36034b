//! Key paths looked up by the page components.
//!
//! Every call site pairs one of these with a literal fallback, so a missing
//! key degrades to the fallback text instead of blank output.

/// Hero section.
pub mod hero {
    pub const SUBTITLE: &str = "hero.subtitle";
    pub const DOWNLOAD_CV: &str = "hero.downloadCV";
    pub const VIEW_PROJECTS: &str = "hero.viewProjects";
    pub const CONTACT_ME: &str = "hero.contactMe";
}

pub mod skills {
    pub const TITLE: &str = "skills.title";
    pub const SUBTITLE: &str = "skills.subtitle";
    pub const LEARNING: &str = "skills.learning";
}

/// Experience section.
pub mod work {
    pub const TITLE: &str = "work.title";
    pub const SUBTITLE: &str = "work.subtitle";
}

/// Project cards.
pub mod projects {
    pub const TITLE: &str = "projects.title";
    pub const SUBTITLE: &str = "projects.subtitle";
    pub const PREVIEW: &str = "projects.preview";
    pub const LIVE_DEMO: &str = "projects.liveDemo";
    pub const CASE_STUDY: &str = "projects.caseStudy";
    pub const CLICK_TO_EXPLORE: &str = "projects.clickToExplore";
    pub const HOVER_TO_EXPLORE: &str = "projects.hoverToExplore";
    pub const FEATURES: &str = "projects.features";
    pub const VIEW_PROJECT: &str = "projects.viewProject";
    pub const VIEW_MORE: &str = "projects.viewMore";
}

/// Contact section and form.
pub mod contact {
    pub const TITLE: &str = "contact.title";
    pub const SUBTITLE: &str = "contact.subtitle";
    pub const EMAIL_LABEL: &str = "contact.emailLabel";
    pub const PHONE_LABEL: &str = "contact.phoneLabel";
    pub const NAME: &str = "contact.name";
    pub const NAME_PLACEHOLDER: &str = "contact.namePlaceholder";
    pub const EMAIL: &str = "contact.email";
    pub const EMAIL_PLACEHOLDER: &str = "contact.emailPlaceholder";
    pub const MESSAGE: &str = "contact.message";
    pub const MESSAGE_PLACEHOLDER: &str = "contact.messagePlaceholder";
    pub const SEND: &str = "contact.send";
    pub const SENDING: &str = "contact.sending";
    pub const SENT: &str = "contact.sent";
}

/// Translated overrides of the profile content.
pub mod profile {
    pub const HEADLINE: &str = "profile.headline";
    /// Skill group id to label (table).
    pub const SKILL_GROUP_LABELS: &str = "profile.skillGroupLabels";
    /// One `{role, period, bullets}` record per job, in display order.
    pub const EXPERIENCE: &str = "profile.experience";
    /// Project slug to `{shortDesc, highlights}` (table).
    pub const PROJECTS: &str = "profile.projects";
}

/// Every catalogued key path.
pub const ALL: &[&str] = &[
    hero::SUBTITLE,
    hero::DOWNLOAD_CV,
    hero::VIEW_PROJECTS,
    hero::CONTACT_ME,
    skills::TITLE,
    skills::SUBTITLE,
    skills::LEARNING,
    work::TITLE,
    work::SUBTITLE,
    projects::TITLE,
    projects::SUBTITLE,
    projects::PREVIEW,
    projects::LIVE_DEMO,
    projects::CASE_STUDY,
    projects::CLICK_TO_EXPLORE,
    projects::HOVER_TO_EXPLORE,
    projects::FEATURES,
    projects::VIEW_PROJECT,
    projects::VIEW_MORE,
    contact::TITLE,
    contact::SUBTITLE,
    contact::EMAIL_LABEL,
    contact::PHONE_LABEL,
    contact::NAME,
    contact::NAME_PLACEHOLDER,
    contact::EMAIL,
    contact::EMAIL_PLACEHOLDER,
    contact::MESSAGE,
    contact::MESSAGE_PLACEHOLDER,
    contact::SEND,
    contact::SENDING,
    contact::SENT,
    profile::HEADLINE,
    profile::SKILL_GROUP_LABELS,
    profile::EXPERIENCE,
    profile::PROJECTS,
];
