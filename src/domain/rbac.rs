use crate::models::Role;

text_enum! {
    /// An action the views show or hide and the service authorizes.
    pub enum Permission {
        ViewPatients => "view_patients",
        ManagePatients => "manage_patients",
        ViewAppointments => "view_appointments",
        ManageAppointments => "manage_appointments",
        RunConsultations => "run_consultations",
        ViewBeds => "view_beds",
        ManageBeds => "manage_beds",
        ViewBilling => "view_billing",
        ManageBilling => "manage_billing",
        ViewStaff => "view_staff",
        ManageStaff => "manage_staff",
        ViewPharmacy => "view_pharmacy",
        ManagePharmacy => "manage_pharmacy",
        DispenseMedicine => "dispense_medicine",
        ViewRecords => "view_records",
    }
}

use Permission::*;

const DOCTOR: &[Permission] = &[
    ViewPatients,
    ViewAppointments,
    RunConsultations,
    ViewBeds,
    ManageBeds,
    ViewStaff,
    ViewPharmacy,
    ViewRecords,
];

const NURSE: &[Permission] = &[
    ViewPatients,
    ViewAppointments,
    ViewBeds,
    ManageBeds,
    ViewPharmacy,
    ViewRecords,
];

const RECEPTIONIST: &[Permission] = &[
    ViewPatients,
    ManagePatients,
    ViewAppointments,
    ManageAppointments,
    ViewBeds,
    ViewBilling,
    ViewStaff,
];

const ACCOUNTANT: &[Permission] = &[
    ViewPatients,
    ViewAppointments,
    ViewBilling,
    ManageBilling,
    ViewStaff,
];

const PHARMACIST: &[Permission] = &[
    ViewPatients,
    ViewPharmacy,
    ManagePharmacy,
    DispenseMedicine,
];

pub fn permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => Permission::ALL,
        Role::Doctor => DOCTOR,
        Role::Nurse => NURSE,
        Role::Receptionist => RECEPTIONIST,
        Role::Accountant => ACCOUNTANT,
        Role::Pharmacist => PHARMACIST,
    }
}

pub fn can(role: Role, permission: Permission) -> bool {
    permissions(role).contains(&permission)
}

pub fn can_any(role: Role, wanted: &[Permission]) -> bool {
    wanted.iter().any(|p| can(role, *p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_permission() {
        for permission in Permission::ALL {
            assert!(can(Role::Admin, *permission), "{permission}");
        }
    }

    #[test]
    fn only_billing_roles_take_payments() {
        let takers: Vec<Role> = Role::ALL
            .iter()
            .copied()
            .filter(|r| can(*r, ManageBilling))
            .collect();
        assert_eq!(takers, vec![Role::Admin, Role::Accountant]);
    }

    #[test]
    fn consultations_are_clinical() {
        assert!(can(Role::Doctor, RunConsultations));
        assert!(!can(Role::Receptionist, RunConsultations));
        assert!(!can(Role::Nurse, RunConsultations));
    }

    #[test]
    fn pharmacist_cannot_see_billing() {
        assert!(!can_any(Role::Pharmacist, &[ViewBilling, ManageBilling]));
        assert!(can_any(Role::Pharmacist, &[ViewBilling, DispenseMedicine]));
    }
}
