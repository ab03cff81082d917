//! Bed state machine.
//!
//! ```text
//! available -> reserved -> occupied -> cleaning -> available
//!     |  ^         |                      |
//!     |  +---------+ (release)            |
//!     v                                   v
//! maintenance <---------------------------+
//!     |
//!     +--> available
//! ```
//!
//! Leaving `occupied` discharges the patient and is only allowed once the
//! admission bill is settled.

use crate::models::{Bed, BedStatus};

/// Side effect the repository applies together with the status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedAction {
    Reserve { patient_id: i64 },
    Release,
    Admit { patient_id: i64 },
    Discharge,
    MarkClean,
    StartMaintenance,
    EndMaintenance,
}

impl BedAction {
    pub fn target(&self) -> BedStatus {
        match self {
            BedAction::Reserve { .. } => BedStatus::Reserved,
            BedAction::Release | BedAction::MarkClean | BedAction::EndMaintenance => {
                BedStatus::Available
            }
            BedAction::Admit { .. } => BedStatus::Occupied,
            BedAction::Discharge => BedStatus::Cleaning,
            BedAction::StartMaintenance => BedStatus::Maintenance,
        }
    }
}

impl BedStatus {
    pub fn can_transition(&self, to: BedStatus) -> bool {
        use BedStatus::*;

        matches!(
            (*self, to),
            (Available, Reserved)
                | (Reserved, Available)
                | (Reserved, Occupied)
                | (Occupied, Cleaning)
                | (Cleaning, Available)
                | (Available, Maintenance)
                | (Cleaning, Maintenance)
                | (Maintenance, Available)
        )
    }
}

/// Decides which action moves `bed` to `target`.
///
/// `bill_settled` describes the active admission's bill: `None` when the bed
/// has no active admission.
pub fn plan_transition(
    bed: &Bed,
    target: BedStatus,
    patient_id: Option<i64>,
    bill_settled: Option<bool>,
) -> Result<BedAction, String> {
    use BedStatus::*;

    if bed.status == target {
        return Err(format!("Bed {} is already {}", bed.label, target));
    }
    if !bed.status.can_transition(target) {
        return Err(format!(
            "Cannot move bed {} from {} to {}",
            bed.label, bed.status, target
        ));
    }

    match (bed.status, target) {
        (Available, Reserved) => patient_id
            .map(|patient_id| BedAction::Reserve { patient_id })
            .ok_or_else(|| format!("A patient is required to reserve bed {}", bed.label)),
        (Reserved, Available) => Ok(BedAction::Release),
        (Reserved, Occupied) => {
            let reserved = bed
                .reserved_for
                .ok_or_else(|| format!("Bed {} has no reservation", bed.label))?;
            match patient_id {
                Some(requested) if requested != reserved => Err(format!(
                    "Bed {} is reserved for patient {}, not {}",
                    bed.label, reserved, requested
                )),
                _ => Ok(BedAction::Admit { patient_id: reserved }),
            }
        }
        (Occupied, Cleaning) => match bill_settled {
            Some(false) => Err(format!(
                "The admission bill for bed {} must be settled before discharge",
                bed.label
            )),
            _ => Ok(BedAction::Discharge),
        },
        (Cleaning, Available) => Ok(BedAction::MarkClean),
        (Available, Maintenance) | (Cleaning, Maintenance) => Ok(BedAction::StartMaintenance),
        (Maintenance, Available) => Ok(BedAction::EndMaintenance),
        (from, to) => Err(format!("Cannot move bed {} from {} to {}", bed.label, from, to)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bed(status: BedStatus, reserved_for: Option<i64>) -> Bed {
        Bed {
            id: 1,
            label: "W1-01".to_string(),
            ward: "General".to_string(),
            status,
            daily_rate: 5_000,
            reserved_for,
        }
    }

    #[test]
    fn full_cycle() {
        let steps = [
            (bed(BedStatus::Available, None), BedStatus::Reserved, Some(9), None),
            (bed(BedStatus::Reserved, Some(9)), BedStatus::Occupied, None, None),
            (bed(BedStatus::Occupied, None), BedStatus::Cleaning, None, Some(true)),
            (bed(BedStatus::Cleaning, None), BedStatus::Available, None, None),
        ];
        let actions: Vec<BedAction> = steps
            .iter()
            .map(|(b, to, p, settled)| plan_transition(b, *to, *p, *settled).unwrap())
            .collect();

        assert_eq!(
            actions,
            vec![
                BedAction::Reserve { patient_id: 9 },
                BedAction::Admit { patient_id: 9 },
                BedAction::Discharge,
                BedAction::MarkClean,
            ]
        );
        for (action, (_, to, _, _)) in actions.iter().zip(steps.iter()) {
            assert_eq!(action.target(), *to);
        }
    }

    #[test]
    fn skipping_states_is_rejected() {
        let err = plan_transition(&bed(BedStatus::Available, None), BedStatus::Occupied, Some(9), None)
            .unwrap_err();
        assert!(err.contains("Cannot move"));
        assert!(plan_transition(&bed(BedStatus::Occupied, None), BedStatus::Available, None, None).is_err());
        assert!(plan_transition(&bed(BedStatus::Occupied, None), BedStatus::Maintenance, None, None).is_err());
    }

    #[test]
    fn reservation_needs_patient_and_admission_must_match() {
        assert!(plan_transition(&bed(BedStatus::Available, None), BedStatus::Reserved, None, None).is_err());

        let reserved = bed(BedStatus::Reserved, Some(9));
        assert!(plan_transition(&reserved, BedStatus::Occupied, Some(10), None).is_err());
        assert_eq!(
            plan_transition(&reserved, BedStatus::Occupied, Some(9), None),
            Ok(BedAction::Admit { patient_id: 9 })
        );
    }

    #[test]
    fn discharge_waits_for_settlement() {
        let occupied = bed(BedStatus::Occupied, None);
        let err = plan_transition(&occupied, BedStatus::Cleaning, None, Some(false)).unwrap_err();
        assert!(err.contains("settled"));
    }

    #[test]
    fn maintenance_entry_and_exit() {
        assert_eq!(
            plan_transition(&bed(BedStatus::Cleaning, None), BedStatus::Maintenance, None, None),
            Ok(BedAction::StartMaintenance)
        );
        assert_eq!(
            plan_transition(&bed(BedStatus::Maintenance, None), BedStatus::Available, None, None),
            Ok(BedAction::EndMaintenance)
        );
        assert!(plan_transition(&bed(BedStatus::Maintenance, None), BedStatus::Reserved, Some(1), None).is_err());
    }

    #[test]
    fn same_status_is_not_a_transition() {
        let err = plan_transition(&bed(BedStatus::Cleaning, None), BedStatus::Cleaning, None, None)
            .unwrap_err();
        assert!(err.contains("already"));
    }
}
