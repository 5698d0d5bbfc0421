//! Site identity: name, default SEO copy, contacts and navigation.

use serde::Serialize;

pub const SITE_NAME: &str = "Cristian's Pastry";
pub const TAGLINE: &str = "Dolci artigianali tra tradizione e passione";
pub const DEFAULT_TITLE: &str = "Cristian's Pastry - Dolci Artigianali";
pub const DEFAULT_DESCRIPTION: &str = "Scopri ricette di dolci artigianali, tecniche di pasticceria e la passione per i dolci fatti in casa.";
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "dolci",
    "pasticceria",
    "ricette",
    "torte",
    "biscotti",
    "artigianale",
];
pub const OWNER_NAME: &str = "Cristian";
pub const CONTACT_EMAIL: &str = "info@cristianspastry.com";
pub const CONTACT_PHONE: &str = "+39 123 456 789";
pub const LOCALE: &str = "it_IT";
pub const LANGUAGE: &str = "it-IT";

/// Social profile link.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SocialProfile {
    pub label: &'static str,
    pub url: &'static str,
}

pub const SOCIAL_PROFILES: &[SocialProfile] = &[
    SocialProfile {
        label: "Instagram",
        url: "https://instagram.com/cristianspastry",
    },
    SocialProfile {
        label: "YouTube",
        url: "https://youtube.com/@cristianspastry",
    },
    SocialProfile {
        label: "Facebook",
        url: "https://facebook.com/cristianspastry",
    },
    SocialProfile {
        label: "TikTok",
        url: "https://tiktok.com/@cristianspastry",
    },
];

/// Main navigation entry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const NAV_LINKS: &[NavLink] = &[
    NavLink {
        label: "Home",
        href: "/",
    },
    NavLink {
        label: "Ricette",
        href: "/ricette",
    },
    NavLink {
        label: "Tecniche",
        href: "/tecniche",
    },
    NavLink {
        label: "Diario",
        href: "/diario",
    },
    NavLink {
        label: "Chi sono",
        href: "/chi-sono",
    },
    NavLink {
        label: "Contatti",
        href: "/contatti",
    },
];

/// Paths listed in the sitemap before recipe pages.
pub const STATIC_PATHS: &[&str] = &["", "chi-sono", "contatti", "ricette", "tecniche", "diario"];
