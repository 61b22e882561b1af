use bridge_core::{
    Auction, AuctionOutcome, AuctionStatus, Call, Card, Contract, DoubleStatus, Position, Strain,
    Suit, Trick,
};

fn trick(leader: Position, cards: [&str; 4]) -> Trick {
    let mut t = Trick::new(leader);
    let mut pos = leader;
    for c in cards {
        t.plays.push((pos, c.parse::<Card>().unwrap()));
        pos = pos.next();
    }
    t
}

#[test]
fn one_spade_passed_out_by_the_others() {
    let mut auction = Auction::new(Position::South);
    let mut status = AuctionStatus::Open;
    for call in ["1S", "P", "P", "P"] {
        let seat = auction.current_player();
        status = auction.apply_bid(seat, call.parse().unwrap()).unwrap();
    }
    assert_eq!(status, AuctionStatus::Completed);

    let Some(AuctionOutcome::Contract(contract)) = auction.outcome() else {
        panic!("expected a contract");
    };
    assert_eq!(contract.level, 1);
    assert_eq!(contract.strain, Strain::Spades);
    assert_eq!(contract.declarer, Position::South);
    assert_eq!(contract.dummy(), Position::North);
}

#[test]
fn four_passes_require_a_redeal() {
    let mut auction = Auction::new(Position::North);
    for seat in [Position::North, Position::East, Position::South] {
        assert_eq!(auction.apply_bid(seat, Call::Pass), Ok(AuctionStatus::Open));
    }
    assert_eq!(
        auction.apply_bid(Position::West, Call::Pass),
        Ok(AuctionStatus::PassedOut)
    );
    assert_eq!(auction.outcome(), Some(AuctionOutcome::PassedOut));
}

#[test]
fn doubled_one_notrump() {
    let auction = Auction::bidding(Position::East, "1N X P P P");
    assert_eq!(
        auction.final_contract(),
        Some(Contract {
            level: 1,
            strain: Strain::NoTrump,
            double_status: DoubleStatus::Doubled,
            declarer: Position::East,
        })
    );
    assert_eq!(auction.final_contract().unwrap().to_string(), "1NX by E");
}

#[test]
fn highest_spade_wins_at_notrump() {
    let t = trick(Position::North, ["SK", "S2", "SA", "SQ"]);
    assert_eq!(t.winner(None), Some(Position::South));
}

#[test]
fn only_trump_wins_the_trick() {
    let t = trick(Position::North, ["C3", "DA", "CK", "H7"]);
    assert_eq!(t.winner(Some(Suit::Hearts)), Some(Position::West));
}
