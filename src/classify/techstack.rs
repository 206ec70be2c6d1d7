//! Tech-stack resolution
//!
//! Every satisfied rule contributes its label. Rule order carries no meaning.

use super::{sig, Condition, Evidence, Rule};
use crate::define_id_enum;
use std::collections::BTreeSet;

use Condition::Word;

define_id_enum! {
    TechStack {
        Python => "python",
        TypeScript => "typescript",
        Go => "go",
        Rust => "rust",
        Java => "java",
        CSharp => "csharp",
        FastMcp => "fastmcp",
        LangChain => "langchain",
        Spring => "spring",
        Quarkus => "quarkus",
        Sse => "sse",
        WebSocket => "websocket",
        Http => "http",
        Cloud => "cloud",
        Local => "local",
        Embedded => "embedded",
        MacOs => "macos",
        Windows => "windows",
        Linux => "linux",
    }
}

#[rustfmt::skip]
pub static TECHSTACK_RULES: &[Rule<TechStack>] = &[
    // Languages
    Rule {
        label: TechStack::Python,
        any_of: &[
            sig!(Language::Python),
            Word("python"),
            Word("py"),
            Word("django"),
            Word("flask"),
            Word("fastapi"),
        ],
    },
    Rule {
        label: TechStack::TypeScript,
        any_of: &[
            sig!(Language::TypeScript),
            Word("typescript"),
            Word("ts"),
            Word("javascript"),
            Word("js"),
            Word("node"),
            Word("nodejs"),
        ],
    },
    Rule { label: TechStack::Go, any_of: &[sig!(Language::Go), Word("go"), Word("golang")] },
    Rule { label: TechStack::Rust, any_of: &[sig!(Language::Rust), Word("rust")] },
    Rule {
        label: TechStack::Java,
        any_of: &[sig!(Language::Java), Word("java"), Word("kotlin"), Word("spring")],
    },
    Rule {
        label: TechStack::CSharp,
        any_of: &[sig!(Language::CSharp), Word("csharp"), Word("dotnet"), Word("net")],
    },
    // Libraries and frameworks
    Rule { label: TechStack::FastMcp, any_of: &[Word("fastmcp"), Word("fastapi")] },
    Rule { label: TechStack::LangChain, any_of: &[Word("langchain"), Word("chain")] },
    Rule {
        label: TechStack::Spring,
        any_of: &[Word("spring"), Word("springboot"), Word("spring-boot")],
    },
    Rule { label: TechStack::Quarkus, any_of: &[Word("quarkus")] },
    // Transports
    Rule { label: TechStack::Sse, any_of: &[sig!(Protocol::Sse), Word("sse")] },
    Rule {
        label: TechStack::WebSocket,
        any_of: &[sig!(Protocol::WebSocket), Word("websocket"), Word("websockets"), Word("ws")],
    },
    Rule {
        label: TechStack::Http,
        any_of: &[sig!(Protocol::Http), Word("http"), Word("rest"), Word("api")],
    },
    // Deployment
    Rule {
        label: TechStack::Cloud,
        any_of: &[sig!(Deployment::Cloud), Word("cloud"), Word("aws"), Word("azure"), Word("gcp")],
    },
    Rule {
        label: TechStack::Local,
        any_of: &[sig!(Deployment::Local), Word("local"), Word("desktop"), Word("cli")],
    },
    Rule { label: TechStack::Embedded, any_of: &[sig!(Deployment::Embedded), Word("embedded")] },
    // Operating systems: marker only
    Rule { label: TechStack::MacOs, any_of: &[sig!(Os::MacOs)] },
    Rule { label: TechStack::Windows, any_of: &[sig!(Os::Windows)] },
    Rule { label: TechStack::Linux, any_of: &[sig!(Os::Linux)] },
];

/// Every label whose rule is satisfied.
pub fn resolve_techstack(evidence: &Evidence<'_>) -> BTreeSet<TechStack> {
    TECHSTACK_RULES
        .iter()
        .filter(|rule| rule.matches(evidence))
        .map(|rule| rule.label)
        .collect()
}

pub fn join(techstack: &BTreeSet<TechStack>) -> String {
    techstack
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a comma-joined field; unknown labels are dropped.
pub fn parse_joined(field: &str) -> BTreeSet<TechStack> {
    field
        .split(',')
        .filter_map(|t| TechStack::from_name(t.trim().to_ascii_lowercase().as_str()))
        .collect()
}

/// `deserialize_with` adapter for stored tech stacks; unknown labels are dropped.
pub fn deserialize_stored<'de, D>(deserializer: D) -> Result<BTreeSet<TechStack>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let labels = <Vec<String> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(labels
        .iter()
        .filter_map(|t| TechStack::from_name(t.trim().to_ascii_lowercase().as_str()))
        .collect())
}
