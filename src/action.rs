use crate::card::TOTAL_CARDS;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::pile::{PileId, TOTAL_FOUNDATIONS, TOTAL_TABLEAUS};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Move(PileId, PileId),
    Draw,
    Recycle,
    NewGame,
}

/// Parses whitespace-separated commands: `D`, `3D`, `C`, `N`, and moves like
/// `R:T1`, `W:F2` or `T4:T1`. A draw count is at most 52.
pub fn parse_actions(s: &str) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    for part in s.split_whitespace() {
        let upper = part.to_ascii_uppercase();
        if upper == "C" {
            actions.push(Action::Recycle);
        } else if upper == "N" {
            actions.push(Action::NewGame);
        } else if let Some(num_str) = upper.strip_suffix('D') {
            let num = if num_str.is_empty() {
                1
            } else {
                match num_str.parse::<usize>() {
                    Ok(num) if num <= TOTAL_CARDS => num,
                    _ => return Err(Error::InvalidAction(part.to_string())),
                }
            };
            actions.extend(std::iter::repeat_n(Action::Draw, num));
        } else if let Some((from, to)) = upper.split_once(':') {
            let invalid = |_| Error::InvalidAction(part.to_string());
            let from = parse_pile_code(from).map_err(invalid)?;
            let to = parse_pile_code(to).map_err(invalid)?;
            actions.push(Action::Move(from, to));
        } else {
            return Err(Error::InvalidAction(part.to_string()));
        }
    }
    Ok(actions)
}

fn parse_pile_code(s: &str) -> Result<PileId> {
    let indexed = |rest: &str, count: usize| -> Option<usize> {
        let num = rest.parse::<usize>().ok()?;
        (1..=count).contains(&num).then(|| num - 1)
    };
    let id = match s {
        "S" => Some(PileId::Stock),
        "W" => Some(PileId::Waste),
        "P" => Some(PileId::Discard),
        "R" => Some(PileId::Reserve),
        _ => {
            if let Some(rest) = s.strip_prefix('F') {
                indexed(rest, TOTAL_FOUNDATIONS).map(PileId::Foundation)
            } else if let Some(rest) = s.strip_prefix('T') {
                indexed(rest, TOTAL_TABLEAUS).map(PileId::Tableau)
            } else {
                None
            }
        }
    };
    id.ok_or_else(|| Error::UnknownPile(s.to_string()))
}

fn pile_code(id: PileId) -> String {
    match id {
        PileId::Stock => "S".into(),
        PileId::Waste => "W".into(),
        PileId::Discard => "P".into(),
        PileId::Reserve => "R".into(),
        PileId::Foundation(idx) => format!("F{}", idx + 1),
        PileId::Tableau(idx) => format!("T{}", idx + 1),
    }
}

pub fn format_actions(actions: &[Action]) -> String {
    let mut list = vec![];
    let mut i = 0;
    while i < actions.len() {
        match actions[i] {
            Action::Draw => {
                let mut count = 1;
                while i + count < actions.len() && matches!(actions[i + count], Action::Draw) {
                    count += 1;
                }
                let str = if count == 1 {
                    "D".into()
                } else {
                    format!("{count}D")
                };
                list.push(str);
                i += count;
                continue;
            }
            Action::Move(from, to) => list.push(format!("{}:{}", pile_code(from), pile_code(to))),
            Action::Recycle => list.push("C".into()),
            Action::NewGame => list.push("N".into()),
        }
        i += 1;
    }
    list.join(" ")
}

/// Runs one action against the game. Returns whether the game changed.
pub fn apply_action(game: &mut Game, action: &Action) -> bool {
    match *action {
        Action::Move(from, to) => game.move_card(from, to),
        Action::Draw => game.turn_stock(),
        Action::Recycle => game.recycle_waste_to_stock(),
        Action::NewGame => {
            game.start_game();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    #[test]
    fn test_parse_actions() {
        let actions = parse_actions("3D r:t1 W:F2 C N T4:T1 D").unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Draw,
                Action::Draw,
                Action::Draw,
                Action::Move(PileId::Reserve, PileId::Tableau(0)),
                Action::Move(PileId::Waste, PileId::Foundation(1)),
                Action::Recycle,
                Action::NewGame,
                Action::Move(PileId::Tableau(3), PileId::Tableau(0)),
                Action::Draw,
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_actions("T5:F1"),
            Err(Error::InvalidAction("T5:F1".to_string()))
        );
        assert!(parse_actions("F0:T1").is_err());
        assert!(parse_actions("XD").is_err());
        assert!(parse_actions("move").is_err());
        assert_eq!(parse_actions("  "), Ok(vec![]));
    }

    #[test]
    fn test_draw_count_is_capped() {
        assert_eq!(
            parse_actions("99999999999D"),
            Err(Error::InvalidAction("99999999999D".to_string()))
        );
        assert!(parse_actions("99999999999999999999999D").is_err());
        assert!(parse_actions("53D").is_err());
        assert_eq!(parse_actions("52D").map(|a| a.len()), Ok(TOTAL_CARDS));
    }

    #[test]
    fn test_format_actions() {
        let actions = parse_actions("D D D P:T2 C D F1:T4").unwrap();
        assert_eq!(format_actions(&actions), "3D P:T2 C D F1:T4");
    }

    #[test]
    fn test_apply_action() {
        let mut game = Game::new(GameConfig {
            seed: Some(5),
            ..Default::default()
        });
        assert!(!apply_action(&mut game, &Action::Draw));
        assert!(apply_action(&mut game, &Action::NewGame));
        assert!(apply_action(&mut game, &Action::Draw));
        assert_eq!(game.board().talon().len(), 3);
        assert!(!apply_action(&mut game, &Action::Recycle));
        assert!(!apply_action(
            &mut game,
            &Action::Move(PileId::Stock, PileId::Tableau(0))
        ));
    }
}
