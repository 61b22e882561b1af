//! Client for a remote bidding and play oracle.
//!
//! The oracle takes a GET query describing the position and answers with a
//! small XML fragment. Any failure is reported as an [`AdvisorError`] and the
//! caller falls back to local decisions.

use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::session::Move;
use bridge_core::board::{Position, Vulnerability};
use bridge_core::call::Call;
use bridge_core::card::Card;
use bridge_core::hand::Hand;
use bridge_core::io::pbn::export_hand;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Everything the oracle is told about one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorRequest {
    /// Scoring mode, e.g. "IMP".
    pub scoring: String,
    pub pov: Position,
    pub dealer: Position,
    pub vulnerability: Vulnerability,
    /// Hands visible to `pov`, indexed by [`Position::idx`].
    pub hands: [Option<Hand>; 4],
    pub calls: Vec<Call>,
    pub plays: Vec<Card>,
}

impl AdvisorRequest {
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sc", self.scoring.clone()),
            ("pov", self.pov.to_char().to_string()),
            ("d", self.dealer.to_char().to_string()),
            ("v", vulnerability_marker(self.vulnerability).to_string()),
        ];
        let seats = [
            ("n", Position::North),
            ("e", Position::East),
            ("s", Position::South),
            ("w", Position::West),
        ];
        for (key, pos) in seats {
            if let Some(hand) = &self.hands[pos.idx()] {
                params.push((key, export_hand(hand)));
            }
        }
        params.push(("h", self.history()));
        params
    }

    /// Calls then played cards, lowercase and dash-joined: `1s-p-2h-p-p-p-sa-s2`.
    pub fn history(&self) -> String {
        self.calls
            .iter()
            .map(|c| match c {
                Call::Pass => "p".to_string(),
                Call::Double => "x".to_string(),
                Call::Redouble => "xx".to_string(),
                Call::Bid { level, strain } => {
                    format!("{level}{}", strain.to_char().to_ascii_lowercase())
                }
            })
            .chain(self.plays.iter().map(|c| c.to_string().to_ascii_lowercase()))
            .collect::<Vec<_>>()
            .join("-")
    }
}

fn vulnerability_marker(v: Vulnerability) -> char {
    match v {
        Vulnerability::None => '-',
        Vulnerability::NS => 'n',
        Vulnerability::EW => 'e',
        Vulnerability::Both => 'b',
    }
}

/// Sends a query and returns the raw response body.
pub trait AdvisorTransport: Send + Sync {
    fn fetch(&self, params: &[(&'static str, String)]) -> Result<String, AdvisorError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AdvisorError> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl AdvisorTransport for HttpTransport {
    fn fetch(&self, params: &[(&'static str, String)]) -> Result<String, AdvisorError> {
        let response = self.client.get(&self.url).query(params).send()?;
        if !response.status().is_success() {
            return Err(AdvisorError::Transport(format!("HTTP {}", response.status())));
        }
        Ok(response.text()?)
    }
}

pub struct Advisor {
    transport: Box<dyn AdvisorTransport>,
}

impl Advisor {
    pub fn new(transport: Box<dyn AdvisorTransport>) -> Self {
        Self { transport }
    }

    /// An HTTP advisor, or `None` when the configuration disables it.
    pub fn from_config(config: &AdvisorConfig) -> Result<Option<Self>, AdvisorError> {
        if !config.enabled {
            return Ok(None);
        }
        let transport =
            HttpTransport::new(config.url.clone(), Duration::from_millis(config.timeout_ms))?;
        Ok(Some(Self::new(Box::new(transport))))
    }

    pub fn ask(&self, request: &AdvisorRequest) -> Result<Move, AdvisorError> {
        let params = request.query_params();
        debug!("advisor query for {}: h={}", request.pov, request.history());
        let body = self.transport.fetch(&params)?;
        let advice = parse_response(&body)?;
        debug!("advisor suggests {advice:?}");
        Ok(advice)
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {pattern}: {e}"))
    })
}

fn error_attr() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r#"\berr\s*=\s*"(-?\d+)""#)
}

fn result_element() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    // Quoted values may contain '>'.
    regex(&CELL, r#"<r\b((?:[^>"']|"[^"]*"|'[^']*')*)/?>"#)
}

fn bid_attr() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r#"\bbid\s*=\s*"([^"]*)""#)
}

fn card_attr() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r#"\bcard\s*=\s*"([^"]*)""#)
}

fn bid_tag() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"<bid>\s*([^<]*?)\s*</bid>")
}

fn card_tag() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"<card>\s*([^<]*?)\s*</card>")
}

/// Parses any of the accepted response shapes:
///
/// - `<sc err="0"><r bid="1S" explanation="..."/></sc>` (or `card="SA"`)
/// - a single line `bid=1S`, `card=SA`, or a bare `1S` / `SA`
/// - `<sc><bid>1S</bid></sc>` (or `<card>SA</card>`)
pub fn parse_response(body: &str) -> Result<Move, AdvisorError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(AdvisorError::Malformed("empty response".into()));
    }
    if body.contains('<') {
        parse_xml(body)
    } else {
        parse_compact(body)
    }
}

fn parse_xml(body: &str) -> Result<Move, AdvisorError> {
    if let Some(caps) = error_attr().captures(body) {
        let code: i64 = caps[1]
            .parse()
            .map_err(|_| AdvisorError::Malformed(format!("error code {}", &caps[1])))?;
        if code != 0 {
            return Err(AdvisorError::ErrorCode(code));
        }
    }

    let (bid, card) = match result_element().captures(body) {
        Some(caps) => {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            (
                bid_attr().captures(attrs).map(|c| c[1].to_string()),
                card_attr().captures(attrs).map(|c| c[1].to_string()),
            )
        }
        None => (
            bid_tag().captures(body).map(|c| c[1].to_string()),
            card_tag().captures(body).map(|c| c[1].to_string()),
        ),
    };
    resolve(bid.as_deref(), card.as_deref())
}

fn parse_compact(body: &str) -> Result<Move, AdvisorError> {
    let line = body.lines().next().unwrap_or("").trim();
    match line.split_once('=') {
        Some((key, value)) => match key.trim().to_ascii_lowercase().as_str() {
            "bid" => resolve(Some(value), None),
            "card" => resolve(None, Some(value)),
            "err" => match value.trim().parse::<i64>() {
                Ok(0) => Err(AdvisorError::Malformed("no move in response".into())),
                Ok(code) => Err(AdvisorError::ErrorCode(code)),
                Err(_) => Err(AdvisorError::Malformed(line.to_string())),
            },
            _ => Err(AdvisorError::Malformed(line.to_string())),
        },
        None => {
            let call = parse_call(line);
            let card = parse_card(line);
            match (call, card) {
                (Some(call), None) => Ok(Move::Call(call)),
                (None, Some(card)) => Ok(Move::Card(card)),
                (Some(_), Some(_)) => Err(AdvisorError::Ambiguous),
                (None, None) => Err(AdvisorError::Malformed(line.to_string())),
            }
        }
    }
}

fn resolve(bid: Option<&str>, card: Option<&str>) -> Result<Move, AdvisorError> {
    let bid = bid.map(str::trim).filter(|s| !s.is_empty());
    let card = card.map(str::trim).filter(|s| !s.is_empty());
    match (bid, card) {
        (Some(_), Some(_)) => Err(AdvisorError::Ambiguous),
        (Some(bid), None) => parse_call(bid)
            .map(Move::Call)
            .ok_or_else(|| AdvisorError::Malformed(format!("bid {bid}"))),
        (None, Some(card)) => parse_card(card)
            .map(Move::Card)
            .ok_or_else(|| AdvisorError::Malformed(format!("card {card}"))),
        (None, None) => Err(AdvisorError::Malformed("no move in response".into())),
    }
}

fn parse_call(s: &str) -> Option<Call> {
    s.trim().parse().ok()
}

fn parse_card(s: &str) -> Option<Card> {
    s.trim().to_ascii_uppercase().parse().ok()
}
