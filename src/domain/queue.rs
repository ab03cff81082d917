//! Appointment queue ordering and the consultation lifecycle.
//!
//! The queue shows open appointments grouped by how ready they are to be
//! seen: the patient currently with the provider first, then paid patients,
//! then patients who still have to pay. Inside a group the lower identifier
//! (earlier arrival) goes first.

use std::cmp::Ordering;

use crate::models::{Appointment, AppointmentStatus, PaymentStatus};

pub fn queue_group(appointment: &Appointment) -> u8 {
    match (appointment.status, appointment.payment_status) {
        (AppointmentStatus::InProgress, _) => 0,
        (AppointmentStatus::Waiting, PaymentStatus::Paid) => 1,
        (AppointmentStatus::Waiting, PaymentStatus::Unpaid) => 2,
        (AppointmentStatus::Completed, _) => 3,
        (AppointmentStatus::Cancelled, _) => 4,
    }
}

pub fn compare_queue(a: &Appointment, b: &Appointment) -> Ordering {
    queue_group(a)
        .cmp(&queue_group(b))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn order_queue(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by(compare_queue);
    appointments
}

/// Open appointments only, in queue order.
pub fn waiting_queue(appointments: Vec<Appointment>) -> Vec<Appointment> {
    order_queue(
        appointments
            .into_iter()
            .filter(|a| a.status.is_open())
            .collect(),
    )
}

/// Checks that `target` is a legal next status for `appointment`.
pub fn check_status_change(
    appointment: &Appointment,
    target: AppointmentStatus,
) -> Result<(), String> {
    use AppointmentStatus::*;

    match (appointment.status, target) {
        (Waiting, InProgress) => {
            if appointment.payment_status != PaymentStatus::Paid {
                return Err(format!(
                    "Appointment {} must be paid before the consultation starts",
                    appointment.id
                ));
            }
            Ok(())
        }
        (InProgress, Completed) | (Waiting, Cancelled) => Ok(()),
        (from, to) if from == to => Err(format!("Appointment {} is already {}", appointment.id, to)),
        (from, to) => Err(format!(
            "Cannot move appointment {} from {} to {}",
            appointment.id, from, to
        )),
    }
}

/// A provider sees one patient at a time.
pub fn ensure_single_active(candidate: &Appointment, others: &[Appointment]) -> Result<(), String> {
    match others.iter().find(|a| {
        a.id != candidate.id
            && a.staff_id == candidate.staff_id
            && a.status == AppointmentStatus::InProgress
    }) {
        Some(active) => Err(format!(
            "Provider {} is already in consultation (appointment {})",
            candidate.staff_id, active.id
        )),
        None => Ok(()),
    }
}

pub fn check_payable(appointment: &Appointment) -> Result<(), String> {
    if appointment.status == AppointmentStatus::Cancelled {
        return Err(format!("Appointment {} is cancelled", appointment.id));
    }
    if appointment.payment_status == PaymentStatus::Paid {
        return Err(format!("Appointment {} is already paid", appointment.id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn appt(id: i64, staff_id: i64, status: AppointmentStatus, paid: bool) -> Appointment {
        Appointment {
            id,
            patient_id: 100 + id,
            staff_id,
            scheduled_at: Utc::now(),
            reason: None,
            status,
            payment_status: if paid { PaymentStatus::Paid } else { PaymentStatus::Unpaid },
            fee: 2_000,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    fn ids(list: &[Appointment]) -> Vec<i64> {
        list.iter().map(|a| a.id).collect()
    }

    #[test]
    fn active_then_paid_then_unpaid_by_arrival() {
        let list = vec![
            appt(1, 7, AppointmentStatus::Waiting, false),
            appt(2, 7, AppointmentStatus::Waiting, true),
            appt(3, 7, AppointmentStatus::InProgress, true),
            appt(4, 7, AppointmentStatus::Waiting, true),
            appt(5, 7, AppointmentStatus::Completed, true),
        ];

        assert_eq!(ids(&order_queue(list.clone())), vec![3, 2, 4, 1, 5]);
        assert_eq!(ids(&waiting_queue(list)), vec![3, 2, 4, 1]);
    }

    #[test]
    fn unpaid_patient_cannot_start() {
        let waiting = appt(1, 7, AppointmentStatus::Waiting, false);
        let err = check_status_change(&waiting, AppointmentStatus::InProgress).unwrap_err();
        assert!(err.contains("must be paid"));

        let paid = appt(2, 7, AppointmentStatus::Waiting, true);
        assert!(check_status_change(&paid, AppointmentStatus::InProgress).is_ok());
    }

    #[test]
    fn finished_appointments_are_final() {
        let done = appt(1, 7, AppointmentStatus::Completed, true);
        assert!(check_status_change(&done, AppointmentStatus::Waiting).is_err());
        assert!(check_status_change(&done, AppointmentStatus::Cancelled).is_err());

        let in_progress = appt(2, 7, AppointmentStatus::InProgress, true);
        assert!(check_status_change(&in_progress, AppointmentStatus::Cancelled).is_err());
        assert!(check_status_change(&in_progress, AppointmentStatus::Completed).is_ok());
    }

    #[test]
    fn one_consultation_per_provider() {
        let candidate = appt(2, 7, AppointmentStatus::Waiting, true);
        let busy = vec![appt(1, 7, AppointmentStatus::InProgress, true)];
        assert!(ensure_single_active(&candidate, &busy).is_err());

        let other_provider = vec![appt(1, 8, AppointmentStatus::InProgress, true)];
        assert!(ensure_single_active(&candidate, &other_provider).is_ok());
    }

    #[test]
    fn pay_rules() {
        assert!(check_payable(&appt(1, 7, AppointmentStatus::Waiting, false)).is_ok());
        assert!(check_payable(&appt(2, 7, AppointmentStatus::Waiting, true)).is_err());
        assert!(check_payable(&appt(3, 7, AppointmentStatus::Cancelled, false)).is_err());
    }
}
