use std::collections::HashMap;
use crate::models::{Nominee, NomineeId, VoteRow};

/// Counts votes per nominee and writes the totals onto the nominee list.
/// Votes for unknown nominees are ignored.
pub fn merge_counts(mut nominees: Vec<Nominee>, votes: &[VoteRow]) -> Vec<Nominee> {
    let counts = votes.iter().fold(HashMap::<&NomineeId, u32>::new(), |mut acc, v| {
        *acc.entry(&v.nominee_id).or_default() += 1;
        acc
    });
    for nominee in &mut nominees {
        nominee.votes = counts.get(&nominee.id).copied().unwrap_or(0);
    }
    nominees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::nominee;

    fn vote(user: &str, nominee: i64) -> VoteRow {
        VoteRow { user_id: user.into(), nominee_id: nominee.into() }
    }

    #[test]
    fn counts_are_merged_by_id() {
        let merged = merge_counts(
            vec![nominee(1, "Abel", 9), nominee(2, "Sara", 9), nominee(3, "Lia", 9)],
            &[vote("a", 2), vote("b", 2), vote("c", 1), vote("d", 42)],
        );
        let counts: Vec<u32> = merged.iter().map(|n| n.votes).collect();
        assert_eq!(counts, vec![1, 2, 0]);
    }
}
