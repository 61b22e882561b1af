use crate::board::{Board, Position, Vulnerability};
use crate::card::Card;
use crate::deal::Deal;
use crate::hand::Hand;
use crate::rank::Rank;
use crate::suit::Suit;

/// Writes the tags needed to reconstruct a board.
pub fn export_board(board: &Board) -> String {
    let vuln_str = match board.vulnerability {
        Vulnerability::None => "None",
        Vulnerability::NS => "NS",
        Vulnerability::EW => "EW",
        Vulnerability::Both => "All",
    };

    let mut s = String::new();
    s.push_str(&format!("[Board \"{}\"]\n", board.number));
    s.push_str(&format!("[Dealer \"{}\"]\n", board.dealer.to_char()));
    s.push_str(&format!("[Vulnerable \"{}\"]\n", vuln_str));
    s.push_str(&format!("[Deal \"{}\"]\n", export_deal(&board.deal, board.dealer)));
    s
}

/// "N:hand E:hand S:hand W:hand", starting from `first`.
pub fn export_deal(deal: &Deal, first: Position) -> String {
    let mut out = format!("{}:", first.to_char());
    let mut pos = first;
    for i in 0..4 {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&export_hand(deal.hand(pos)));
        pos = pos.next();
    }
    out
}

/// Spades first, ranks high to low, ten as `T`: "AKT.Q2.J987.5432".
pub fn export_hand(hand: &Hand) -> String {
    Suit::DESCENDING
        .iter()
        .map(|&suit| {
            hand.ranks_in(suit)
                .into_iter()
                .map(Rank::to_char)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn tag_value<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let rest = line.trim().strip_prefix('[')?.strip_prefix(tag)?;
    rest.trim().strip_prefix('"')?.strip_suffix("\"]")
}

pub fn import_board(pbn: &str) -> Option<Board> {
    let mut number = 1;
    let mut dealer = None;
    let mut vulnerability = None;
    let mut deal = None;

    for line in pbn.lines() {
        if let Some(v) = tag_value(line, "Board") {
            number = v.parse().ok()?;
        } else if let Some(v) = tag_value(line, "Dealer") {
            dealer = Position::from_char(v.chars().next()?);
        } else if let Some(v) = tag_value(line, "Vulnerable") {
            vulnerability = Some(match v {
                "None" | "Love" | "-" => Vulnerability::None,
                "NS" => Vulnerability::NS,
                "EW" => Vulnerability::EW,
                "All" | "Both" => Vulnerability::Both,
                _ => return None,
            });
        } else if let Some(v) = tag_value(line, "Deal") {
            deal = Some(import_deal(v)?);
        }
    }

    Some(Board {
        number,
        dealer: dealer.unwrap_or_else(|| Position::dealer_from_board_number(number)),
        vulnerability: vulnerability.unwrap_or_else(|| Vulnerability::from_board_number(number)),
        deal: deal?,
    })
}

pub fn import_deal(s: &str) -> Option<Deal> {
    let (first, hands) = s.trim().split_once(':')?;
    let mut pos = Position::from_char(first.chars().next()?)?;
    let mut deal = Deal::default();
    let parts: Vec<&str> = hands.split_whitespace().collect();
    if parts.len() != 4 {
        return None;
    }
    for part in parts {
        *deal.hand_mut(pos) = import_hand(part)?;
        pos = pos.next();
    }
    deal.validate().ok()?;
    Some(deal)
}

/// Parses "spades.hearts.diamonds.clubs". Duplicate cards are rejected.
pub fn import_hand(hand_str: &str) -> Option<Hand> {
    let suits: Vec<&str> = hand_str.trim().split('.').collect();
    if suits.len() != 4 {
        return None;
    }

    let mut hand = Hand::default();
    for (suit, run) in Suit::DESCENDING.into_iter().zip(suits) {
        for c in run.chars() {
            let rank = Rank::from_char(c)?;
            if !hand.insert(Card { suit, rank }) {
                return None;
            }
        }
    }
    Some(hand)
}
