//! Long-term care cost from the onset age

use crate::assumptions::LongTermCareCosts;
use crate::profile::LongTermCareElection;

/// Annual long-term-care cost per year: zero without an election or before onset,
/// otherwise the monthly cost x 12 compounded at healthcare inflation from year 0.
pub fn project_long_term_care(
    election: Option<&LongTermCareElection>,
    costs: &LongTermCareCosts,
    starting_age: i32,
    years: usize,
    healthcare_inflation: f64,
) -> Vec<f64> {
    let Some(election) = election else {
        return vec![0.0; years];
    };

    let annual = election.monthly_cost(costs) * 12.0;
    let onset_age = costs.onset_age as i32;

    (0..years)
        .map(|i| {
            if starting_age + i as i32 >= onset_age {
                annual * (1.0 + healthcare_inflation).powi(i as i32)
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::LongTermCareTier;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_election_is_zero() {
        let costs = LongTermCareCosts::default();
        let ltc = project_long_term_care(None, &costs, 60, 30, 0.05);
        assert_eq!(ltc.len(), 30);
        assert!(ltc.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_starts_at_onset_age() {
        let costs = LongTermCareCosts::default();
        let election = LongTermCareElection::Tier(LongTermCareTier::AssistedLiving);
        let ltc = project_long_term_care(Some(&election), &costs, 70, 10, 0.05);

        assert!(ltc[..5].iter().all(|&c| c == 0.0));
        assert_relative_eq!(ltc[5], 5_900.0 * 12.0 * 1.05f64.powi(5), max_relative = 1e-12);
        assert!(ltc[6] > ltc[5]);
    }
}
