use super::role::ScopeKind;

/// Geographic slice of the data a viewer may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerScope {
    Unscoped,
    Tehsils(Vec<i64>),
    GramPanchayats(Vec<i64>),
    Gaons(Vec<i64>),
}

/// Where a death record sits in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocation {
    pub tehsil_id: i64,
    pub gram_panchayat_id: i64,
    pub gaon_id: i64,
}

impl ViewerScope {
    pub fn from_assignments(kind: ScopeKind, ids: Vec<i64>) -> Self {
        match kind {
            ScopeKind::Unscoped => ViewerScope::Unscoped,
            ScopeKind::Tehsil => ViewerScope::Tehsils(ids),
            ScopeKind::GramPanchayat => ViewerScope::GramPanchayats(ids),
            ScopeKind::Gaon => ViewerScope::Gaons(ids),
        }
    }

    pub fn permits(&self, location: &RecordLocation) -> bool {
        match self {
            ViewerScope::Unscoped => true,
            ViewerScope::Tehsils(ids) => ids.contains(&location.tehsil_id),
            ViewerScope::GramPanchayats(ids) => ids.contains(&location.gram_panchayat_id),
            ViewerScope::Gaons(ids) => ids.contains(&location.gaon_id),
        }
    }

    pub fn permits_gram_panchayat(&self, gram_panchayat_id: i64, tehsil_id: i64) -> bool {
        match self {
            ViewerScope::Unscoped => true,
            ViewerScope::Tehsils(ids) => ids.contains(&tehsil_id),
            ViewerScope::GramPanchayats(ids) => ids.contains(&gram_panchayat_id),
            // a gaon-scoped viewer never owns a whole gram panchayat
            ViewerScope::Gaons(_) => false,
        }
    }

    /// Column of the listing projection the scope constrains and the ids it
    /// allows. `None` means no restriction.
    pub fn constraint(&self) -> Option<(&'static str, &[i64])> {
        match self {
            ViewerScope::Unscoped => None,
            ViewerScope::Tehsils(ids) => Some(("tehsil_id", ids)),
            ViewerScope::GramPanchayats(ids) => Some(("gram_panchayat_id", ids)),
            ViewerScope::Gaons(ids) => Some(("gaon_id", ids)),
        }
    }

    pub fn matches_nothing(&self) -> bool {
        matches!(self.constraint(), Some((_, ids)) if ids.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOC: RecordLocation = RecordLocation {
        tehsil_id: 1,
        gram_panchayat_id: 10,
        gaon_id: 100,
    };

    #[test]
    fn sachiv_assigned_to_panchayat_sees_record() {
        assert!(ViewerScope::GramPanchayats(vec![10]).permits(&LOC));
    }

    #[test]
    fn sachiv_elsewhere_sees_nothing() {
        assert!(!ViewerScope::GramPanchayats(vec![11, 12]).permits(&LOC));
    }

    #[test]
    fn sdm_reaches_record_through_tehsil() {
        assert!(ViewerScope::Tehsils(vec![1]).permits(&LOC));
        assert!(!ViewerScope::Tehsils(vec![2]).permits(&LOC));
    }

    #[test]
    fn lekhpal_scoped_by_gaon() {
        assert!(ViewerScope::Gaons(vec![100]).permits(&LOC));
        assert!(!ViewerScope::Gaons(vec![101]).permits(&LOC));
    }

    #[test]
    fn district_level_sees_everything() {
        assert!(ViewerScope::Unscoped.permits(&LOC));
        assert!(ViewerScope::Unscoped.constraint().is_none());
    }

    #[test]
    fn no_assignments_matches_nothing() {
        let scope = ViewerScope::from_assignments(ScopeKind::GramPanchayat, vec![]);
        assert!(scope.matches_nothing());
        assert!(!scope.permits(&LOC));
        assert!(!ViewerScope::Unscoped.matches_nothing());
    }

    #[test]
    fn constraint_names_the_listing_column() {
        let scope = ViewerScope::Tehsils(vec![3, 4]);
        assert_eq!(scope.constraint(), Some(("tehsil_id", &[3_i64, 4][..])));
    }

    #[test]
    fn panchayat_ownership() {
        assert!(ViewerScope::Tehsils(vec![1]).permits_gram_panchayat(10, 1));
        assert!(ViewerScope::GramPanchayats(vec![10]).permits_gram_panchayat(10, 1));
        assert!(!ViewerScope::Gaons(vec![100]).permits_gram_panchayat(10, 1));
    }
}
