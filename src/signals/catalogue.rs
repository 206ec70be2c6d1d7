//! Text pattern catalogue
//!
//! One case-insensitive pattern per signal. Patterns are independent: a text may
//! match any number of them and no pattern suppresses another.

use super::{Deployment, Domain, Language, Os, Protocol, Signal};
use regex::Regex;
use std::sync::OnceLock;

/// Returns the text pattern that evidences `signal`.
pub fn pattern_for(signal: Signal) -> &'static str {
    match signal {
        Signal::Language(lang) => match lang {
            Language::Python => r"\bpython\d?\b|\bpypi\b",
            Language::TypeScript => r"\btypescript\b|\bjavascript\b|\bnode\.?js\b|\bdeno\b",
            Language::Go => {
                r"\bgolang\b|\bgo (?:server|client|sdk|library|module|implementation)\b|\b(?:in|with|using) go\b"
            }
            Language::Rust => r"\brust\b|\bcrates\.io\b",
            Language::Java => r"\bjava\b|\bkotlin\b|\bjvm\b",
            Language::CSharp => r"\bc#|\bcsharp\b|\bdotnet\b|\.net\b",
        },
        Signal::Deployment(deployment) => match deployment {
            Deployment::Cloud => r"\bcloud\b|\baws\b|\bazure\b|\bgcp\b",
            Deployment::Local => r"\blocal(?:ly)?\b|\bdesktop\b|\bcli\b|\boffline\b",
            Deployment::Embedded => r"\bembedded\b|\bmicrocontrollers?\b|\besp32\b|\barduino\b",
        },
        Signal::Os(os) => match os {
            Os::MacOs => r"\bmacos\b|\bmac os\b|\bos ?x\b",
            Os::Windows => r"\bwindows\b",
            Os::Linux => r"\blinux\b",
        },
        Signal::Protocol(protocol) => match protocol {
            Protocol::Mcp => r"\bmcp\b|model context protocol",
            Protocol::Sse => r"\bsse\b|server[- ]sent events",
            Protocol::WebSocket => r"\bweb ?sockets?\b|\bws\b",
            Protocol::Http => r"\bhttps?\b|\brest(?:ful)?\b|\bapis?\b",
        },
        Signal::Domain(domain) => domain_pattern(domain),
    }
}

fn domain_pattern(domain: Domain) -> &'static str {
    match domain {
        Domain::Aggregator => r"\baggregat\w*",
        Domain::ArtCulture => r"\bart\b|\bartworks?\b|\bmuseums?\b|\bcultur(?:e|al)\b",
        Domain::Browser => r"\bbrowsers?\b|\bplaywright\b|\bpuppeteer\b|\bselenium\b",
        Domain::Filesystem => r"\bfile ?systems?\b|\bdirector(?:y|ies)\b",
        Domain::CodeExecution => {
            r"\bcode execution\b|\bexecutes? code\b|\bcode interpreter\b|\bsandbox(?:ed)?\b"
        }
        Domain::CodingAgent => r"\bcoding agents?\b|\bagentic coding\b",
        Domain::CommandLine => r"\bcommand[- ]line\b|\bshell\b|\bterminal\b",
        Domain::Communication => r"\bcommunications?\b|\bemails?\b|\bsms\b",
        Domain::CustomerData => r"\bcustomer data\b|\bcrm\b|\bcdp\b",
        Domain::Database => {
            r"\bdatabases?\b|\bsql\b|\bpostgres(?:ql)?\b|\bmysql\b|\bsqlite\b|\bmongodb\b|\bredis\b"
        }
        Domain::Analytics => r"\banalytics\b|\bdashboards?\b|\bmetrics\b|\bobservability\b",
        Domain::Delivery => r"\bdelivery\b|\bshipping\b|\blogistics\b",
        Domain::DeveloperTool => r"\bdeveloper tools?\b|\bdevtools?\b",
        Domain::DataScience => r"\bdata science\b|\bmachine learning\b|\bjupyter\b|\bpandas\b",
        Domain::Finance => r"\bfinanc\w*|\bfintech\b|\bstocks?\b|\bpayments?\b|\bbanking\b",
        Domain::Gaming => r"\bgam(?:e|es|ing)\b|\bminecraft\b",
        Domain::Knowledge => r"\bknowledge\b|\bmemory\b|\bnotes\b|\bwiki\b",
        Domain::Location => r"\blocations?\b|\bmaps\b|\bgeocod\w*|\bgps\b",
        Domain::Marketing => r"\bmarketing\b|\bseo\b|\bad campaigns?\b",
        Domain::Search => r"\bsearch\w*|\bscrap(?:e|er|ing)\b|\bcrawl\w*",
        Domain::Security => r"\bsecurity\b|\bvulnerabilit\w*|\bpentest\w*|\bmalware\b",
        Domain::Sports => r"\bsports?\b|\bfootball\b|\bsoccer\b|\bnba\b",
        Domain::Support => r"\bcustomer support\b|\bhelp ?desk\b|\bservice management\b|\bticketing\b",
        Domain::Translation => r"\btranslat\w*|\blocali[sz]ation\b",
        Domain::Travel => r"\btravel\w*|\bflights?\b|\bhotels?\b|\btransportation\b|\btransit\b",
        Domain::VersionControl => {
            r"\bversion control\b|\bgit repositor\w*|\bgitlab\b|\bpull requests?\b"
        }
        Domain::Official => r"\bofficial\b",
        Domain::Framework => r"\bframeworks?\b|\bsdks?\b|\bboilerplate\b|\btemplates?\b",
        Domain::Utility => {
            r"\butilit(?:y|ies)\b|\bgateways?\b|\bprox(?:y|ies)\b|\bbridges?\b|\bhelpers?\b"
        }
        Domain::Client => r"\bclients?\b|\bchat ?bots?\b|\bchat interface\b",
        Domain::Tutorial => r"\btutorials?\b|\bguides?\b|\bexamples?\b|\bdemos?\b|\bwalkthrough\b",
        Domain::Community => r"\bcommunity\b|\bdiscord\b|\breddit\b|\bforums?\b",
        Domain::Api => r"\bapis?\b|\bgraphql\b|\bopenapi\b|\bendpoints?\b",
        Domain::Storage => r"\bstorage\b|\bs3\b|\bbuckets?\b|\bgoogle drive\b|\bdropbox\b",
        Domain::Ai => r"\bai\b|\bllms?\b|\bgpt\w*|\bclaude\b|\bopenai\b|\bembeddings?\b",
        Domain::Messaging => r"\bmessag\w*|\bslack\b|\btelegram\b|\bwhatsapp\b",
    }
}

/// Compiled catalogue in [`Signal::all`] order.
pub(crate) fn compiled() -> &'static [(Signal, Regex)] {
    static CATALOGUE: OnceLock<Vec<(Signal, Regex)>> = OnceLock::new();
    CATALOGUE.get_or_init(|| {
        Signal::all()
            .iter()
            .map(|signal| {
                let pattern = format!("(?i){}", pattern_for(*signal));
                let re = Regex::new(&pattern).expect("signal catalogue pattern is valid");
                (*signal, re)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_compiles() {
        assert_eq!(compiled().len(), Signal::all().len());
    }

    #[test]
    fn test_go_pattern_skips_plain_verb() {
        let (_, re) = compiled()
            .iter()
            .find(|(s, _)| *s == Signal::Language(Language::Go))
            .unwrap();
        assert!(re.is_match("An MCP server written in Go"));
        assert!(re.is_match("golang implementation"));
        assert!(!re.is_match("ready to go with Google Drive"));
    }

    #[test]
    fn test_csharp_pattern_matches_hash_notation() {
        let (_, re) = compiled()
            .iter()
            .find(|(s, _)| *s == Signal::Language(Language::CSharp))
            .unwrap();
        assert!(re.is_match("Built with C# and ASP.NET"));
        assert!(!re.is_match("a basic tool"));
    }
}
