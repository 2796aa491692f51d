use super::Shortlist;

pub trait RankEngine: Send + Sync {
    fn rank<'a>(&self, shortlist: Shortlist<'a>) -> Shortlist<'a>;
}

/// Orders by suitability score, highest first. Equal scores keep their input order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SuitabilityRankEngine;

impl RankEngine for SuitabilityRankEngine {
    fn rank<'a>(&self, shortlist: Shortlist<'a>) -> Shortlist<'a> {
        rank_vendors(shortlist)
    }
}

pub fn rank_vendors(shortlist: Shortlist<'_>) -> Shortlist<'_> {
    let mut vendors = shortlist.into_refs();
    // `sort_by` is stable
    vendors.sort_by(|left, right| right.suitability_score.cmp(&left.suitability_score));
    Shortlist::from_refs(vendors)
}

#[cfg(test)]
mod tests {
    use super::rank_vendors;
    use crate::domain::fixtures::vendor;
    use crate::domain::vendor::Vendor;
    use crate::pipeline::Shortlist;

    fn scored(id: u32, score: u8) -> Vendor {
        let mut vendor = vendor(id, &format!("vendor-{id}"));
        vendor.suitability_score = score;
        vendor
    }

    #[test]
    fn ranks_descending_by_suitability() {
        let vendors = vec![scored(1, 86), scored(2, 95), scored(3, 89), scored(4, 91)];
        let ranked = rank_vendors(Shortlist::from_slice(&vendors));

        let scores = ranked.iter().map(|vendor| vendor.suitability_score).collect::<Vec<_>>();
        assert_eq!(scores, vec![95, 91, 89, 86]);
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn ties_keep_relative_input_order() {
        let vendors =
            vec![scored(1, 80), scored(2, 90), scored(3, 80), scored(4, 90), scored(5, 80)];
        let ranked = rank_vendors(Shortlist::from_slice(&vendors));

        let ids = ranked.iter().map(|vendor| vendor.id.0).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 4, 1, 3, 5]);
    }

    #[test]
    fn empty_shortlist_ranks_to_empty() {
        let vendors: Vec<Vendor> = Vec::new();
        assert!(rank_vendors(Shortlist::from_slice(&vendors)).is_empty());
    }
}
