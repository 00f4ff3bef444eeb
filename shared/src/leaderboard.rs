use std::cmp::Ordering;
use crate::models::Nominee;

const MEDALS: [&str; 5] = ["🥇", "🥈", "🥉", "🏅", "🏅"];

#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    /// 1-based.
    pub rank: usize,
    pub medal: &'static str,
    pub nominee: Nominee,
}

#[derive(Debug)]
struct SortedNominee<'a> {
    nominee: &'a Nominee,
    idx: usize,
}

/// Highest vote counts first. Equal counts keep their order in `nominees`.
pub fn top(nominees: &[Nominee], size: usize) -> Vec<Ranked> {
    let mut sorted: Vec<_> = nominees.iter()
        .enumerate()
        .map(|(idx, nominee)| SortedNominee { nominee, idx })
        .collect();

    sorted.sort_unstable_by(|a, b| {
        b.nominee.votes.cmp(&a.nominee.votes)
            .then_with(|| a.idx.cmp(&b.idx))
    });

    sorted.into_iter()
        .take(size)
        .enumerate()
        .map(|(i, s)| Ranked {
            rank: i + 1,
            medal: MEDALS.get(i).copied().unwrap_or(MEDALS[MEDALS.len() - 1]),
            nominee: s.nominee.clone(),
        })
        .collect()
}

pub fn is_ranked_order(ranked: &[Ranked]) -> bool {
    ranked.windows(2).all(|w| w[0].nominee.votes.cmp(&w[1].nominee.votes) != Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::nominee;

    #[test]
    fn fewer_than_five() {
        let board = top(&[nominee(1, "Abel", 2), nominee(2, "Sara", 5)], 5);
        let names: Vec<_> = board.iter().map(|r| r.nominee.display_name()).collect();
        assert_eq!(names, vec!["Sara", "Abel"]);
        assert_eq!(board[0].medal, "🥇");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn keeps_five_highest() {
        let nominees: Vec<_> = (1..=8).map(|i| nominee(i, "n", (i as u32 * 7) % 10)).collect();
        let board = top(&nominees, 5);
        assert_eq!(board.len(), 5);
        assert!(is_ranked_order(&board));

        let lowest_kept = board.last().map(|r| r.nominee.votes).unwrap();
        let kept: Vec<_> = board.iter().map(|r| r.nominee.id.clone()).collect();
        assert!(nominees.iter()
            .filter(|n| !kept.contains(&n.id))
            .all(|n| n.votes <= lowest_kept));
        assert_eq!(board[4].medal, "🏅");
    }

    #[test]
    fn ties_follow_list_order() {
        let board = top(&[nominee(1, "A", 3), nominee(2, "B", 3), nominee(3, "C", 4)], 5);
        let ids: Vec<_> = board.iter().map(|r| r.nominee.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }
}
