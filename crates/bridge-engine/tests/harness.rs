use bridge_core::auction::Auction;
use bridge_core::board::Position;
use bridge_core::call::Call;
use bridge_core::io::hand_parser::parse_hand;
use bridge_engine::heuristic::HeuristicSelector;
use indexmap::IndexMap;
use std::fs;

#[test]
fn run_heuristic_vectors() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/heuristic_vectors.yaml");
    let content = fs::read_to_string(path).expect("Failed to read test vectors");
    let suites: IndexMap<String, Vec<Vec<String>>> =
        serde_yaml::from_str(&content).expect("Failed to parse YAML");
    let selector = HeuristicSelector::natural().expect("embedded rules parse");

    let mut failures = Vec::new();
    let mut cases = 0;
    for (suite, vectors) in &suites {
        for case in vectors {
            cases += 1;
            let hand_str = &case[0];
            let expected = &case[1];
            let history = case.get(2).map(String::as_str).unwrap_or("");

            let hand = parse_hand(hand_str)
                .unwrap_or_else(|| panic!("{suite}: bad hand {hand_str}"));
            let auction = Auction::parse(Position::North, history)
                .unwrap_or_else(|e| panic!("{suite}: bad auction {history:?}: {e}"));
            let expected: Option<Call> = if expected == "-" {
                None
            } else {
                Some(expected.parse().unwrap_or_else(|_| panic!("{suite}: bad call {expected}")))
            };

            let actual = selector.choose_call(&hand, &auction).map(|d| d.call);
            if actual != expected {
                failures.push(format!(
                    "{suite}: {hand_str} after {history:?}: expected {expected:?}, got {actual:?}"
                ));
            }
        }
    }

    assert!(cases > 0, "no vectors loaded");
    if !failures.is_empty() {
        for f in &failures {
            println!("{f}");
        }
        panic!("{} of {cases} heuristic vectors failed", failures.len());
    }
}
