//! Message catalog for the console. Every user-facing label goes through
//! [`t`] so a locale switch changes the whole view at once.

use crate::models::{AppointmentStatus, BedStatus, BillStatus};

text_enum! {
    pub enum Locale {
        En => "en",
        Fr => "fr",
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::En
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Dashboard,
    Patients,
    Queue,
    Beds,
    Admissions,
    Billing,
    Transactions,
    Staff,
    Pharmacy,
    Records,
    Profile,
    Id,
    Name,
    DateOfBirth,
    Phone,
    Role,
    Department,
    Active,
    Position,
    Patient,
    Doctor,
    Scheduled,
    Status,
    Payment,
    Fee,
    Label,
    Ward,
    Admitted,
    Discharged,
    Bill,
    Date,
    Reason,
    DailyRate,
    Total,
    Paid,
    Outstanding,
    Method,
    Amount,
    Medicine,
    Strength,
    Stock,
    UnitPrice,
    LowStock,
    Actions,
    Empty,
    LoggedIn,
    LoggedOut,
    SessionExpired,
    NotLoggedIn,
    NotAllowed,
    GenericError,
    Waiting,
    InProgress,
    Completed,
    Cancelled,
    Available,
    Reserved,
    Occupied,
    Cleaning,
    Maintenance,
    Unpaid,
    Partial,
    Settled,
    RegisterPatient,
    BookAppointment,
    StartConsultation,
    CompleteConsultation,
    CancelAppointment,
    TakePayment,
    ChangeBedStatus,
    CreateBill,
    RecordPayment,
    HireStaff,
    CreateAccount,
    AddMedicine,
    Dispense,
    Restock,
}

/// Looks up `msg` in the catalog for `locale`.
pub fn t(locale: Locale, msg: Msg) -> &'static str {
    match locale {
        Locale::En => en(msg),
        Locale::Fr => fr(msg),
    }
}

fn en(msg: Msg) -> &'static str {
    match msg {
        Msg::Dashboard => "Dashboard",
        Msg::Patients => "Patients",
        Msg::Queue => "Waiting queue",
        Msg::Beds => "Beds",
        Msg::Admissions => "Admissions",
        Msg::Billing => "Billing",
        Msg::Transactions => "Transactions",
        Msg::Staff => "Staff",
        Msg::Pharmacy => "Pharmacy",
        Msg::Records => "Medical records",
        Msg::Profile => "Profile",
        Msg::Id => "ID",
        Msg::Name => "Name",
        Msg::DateOfBirth => "Date of birth",
        Msg::Phone => "Phone",
        Msg::Role => "Role",
        Msg::Department => "Department",
        Msg::Active => "Active",
        Msg::Position => "#",
        Msg::Patient => "Patient",
        Msg::Doctor => "Doctor",
        Msg::Scheduled => "Scheduled",
        Msg::Status => "Status",
        Msg::Payment => "Payment",
        Msg::Fee => "Fee",
        Msg::Label => "Bed",
        Msg::Ward => "Ward",
        Msg::Admitted => "Admitted",
        Msg::Discharged => "Discharged",
        Msg::Bill => "Bill",
        Msg::Date => "Date",
        Msg::Reason => "Reason",
        Msg::DailyRate => "Daily rate",
        Msg::Total => "Total",
        Msg::Paid => "Paid",
        Msg::Outstanding => "Outstanding",
        Msg::Method => "Method",
        Msg::Amount => "Amount",
        Msg::Medicine => "Medicine",
        Msg::Strength => "Strength",
        Msg::Stock => "Stock",
        Msg::UnitPrice => "Unit price",
        Msg::LowStock => "Low stock",
        Msg::Actions => "Available actions",
        Msg::Empty => "Nothing to show",
        Msg::LoggedIn => "Logged in",
        Msg::LoggedOut => "Logged out",
        Msg::SessionExpired => "Your session has expired, please log in again",
        Msg::NotLoggedIn => "You are not logged in",
        Msg::NotAllowed => "Your role does not allow this action",
        Msg::GenericError => "Something went wrong",
        Msg::Waiting => "waiting",
        Msg::InProgress => "in progress",
        Msg::Completed => "completed",
        Msg::Cancelled => "cancelled",
        Msg::Available => "available",
        Msg::Reserved => "reserved",
        Msg::Occupied => "occupied",
        Msg::Cleaning => "cleaning",
        Msg::Maintenance => "maintenance",
        Msg::Unpaid => "unpaid",
        Msg::Partial => "partial",
        Msg::Settled => "paid",
        Msg::RegisterPatient => "register patient",
        Msg::BookAppointment => "book appointment",
        Msg::StartConsultation => "start consultation",
        Msg::CompleteConsultation => "complete consultation",
        Msg::CancelAppointment => "cancel appointment",
        Msg::TakePayment => "take payment",
        Msg::ChangeBedStatus => "change bed status",
        Msg::CreateBill => "create bill",
        Msg::RecordPayment => "record payment",
        Msg::HireStaff => "add staff member",
        Msg::CreateAccount => "create account",
        Msg::AddMedicine => "add medicine",
        Msg::Dispense => "dispense",
        Msg::Restock => "restock",
    }
}

fn fr(msg: Msg) -> &'static str {
    match msg {
        Msg::Dashboard => "Tableau de bord",
        Msg::Patients => "Patients",
        Msg::Queue => "File d'attente",
        Msg::Beds => "Lits",
        Msg::Admissions => "Hospitalisations",
        Msg::Billing => "Facturation",
        Msg::Transactions => "Transactions",
        Msg::Staff => "Personnel",
        Msg::Pharmacy => "Pharmacie",
        Msg::Records => "Dossiers médicaux",
        Msg::Profile => "Profil",
        Msg::Id => "ID",
        Msg::Name => "Nom",
        Msg::DateOfBirth => "Date de naissance",
        Msg::Phone => "Téléphone",
        Msg::Role => "Rôle",
        Msg::Department => "Service",
        Msg::Active => "Actif",
        Msg::Position => "#",
        Msg::Patient => "Patient",
        Msg::Doctor => "Médecin",
        Msg::Scheduled => "Prévu",
        Msg::Status => "Statut",
        Msg::Payment => "Paiement",
        Msg::Fee => "Tarif",
        Msg::Label => "Lit",
        Msg::Ward => "Unité",
        Msg::Admitted => "Admis le",
        Msg::Discharged => "Sorti le",
        Msg::Bill => "Facture",
        Msg::Date => "Date",
        Msg::Reason => "Motif",
        Msg::DailyRate => "Tarif journalier",
        Msg::Total => "Total",
        Msg::Paid => "Payé",
        Msg::Outstanding => "Restant dû",
        Msg::Method => "Moyen",
        Msg::Amount => "Montant",
        Msg::Medicine => "Médicament",
        Msg::Strength => "Dosage",
        Msg::Stock => "Stock",
        Msg::UnitPrice => "Prix unitaire",
        Msg::LowStock => "Stock faible",
        Msg::Actions => "Actions disponibles",
        Msg::Empty => "Rien à afficher",
        Msg::LoggedIn => "Connecté",
        Msg::LoggedOut => "Déconnecté",
        Msg::SessionExpired => "Votre session a expiré, veuillez vous reconnecter",
        Msg::NotLoggedIn => "Vous n'êtes pas connecté",
        Msg::NotAllowed => "Votre rôle ne permet pas cette action",
        Msg::GenericError => "Une erreur est survenue",
        Msg::Waiting => "en attente",
        Msg::InProgress => "en cours",
        Msg::Completed => "terminé",
        Msg::Cancelled => "annulé",
        Msg::Available => "disponible",
        Msg::Reserved => "réservé",
        Msg::Occupied => "occupé",
        Msg::Cleaning => "nettoyage",
        Msg::Maintenance => "maintenance",
        Msg::Unpaid => "impayé",
        Msg::Partial => "partiel",
        Msg::Settled => "payé",
        Msg::RegisterPatient => "enregistrer un patient",
        Msg::BookAppointment => "prendre rendez-vous",
        Msg::StartConsultation => "démarrer la consultation",
        Msg::CompleteConsultation => "terminer la consultation",
        Msg::CancelAppointment => "annuler le rendez-vous",
        Msg::TakePayment => "encaisser",
        Msg::ChangeBedStatus => "changer le statut du lit",
        Msg::CreateBill => "créer une facture",
        Msg::RecordPayment => "enregistrer un paiement",
        Msg::HireStaff => "ajouter un membre du personnel",
        Msg::CreateAccount => "créer un compte",
        Msg::AddMedicine => "ajouter un médicament",
        Msg::Dispense => "délivrer",
        Msg::Restock => "réapprovisionner",
    }
}

pub fn appointment_status(status: AppointmentStatus) -> Msg {
    match status {
        AppointmentStatus::Waiting => Msg::Waiting,
        AppointmentStatus::InProgress => Msg::InProgress,
        AppointmentStatus::Completed => Msg::Completed,
        AppointmentStatus::Cancelled => Msg::Cancelled,
    }
}

pub fn bed_status(status: BedStatus) -> Msg {
    match status {
        BedStatus::Available => Msg::Available,
        BedStatus::Reserved => Msg::Reserved,
        BedStatus::Occupied => Msg::Occupied,
        BedStatus::Cleaning => Msg::Cleaning,
        BedStatus::Maintenance => Msg::Maintenance,
    }
}

pub fn bill_status(status: BillStatus) -> Msg {
    match status {
        BillStatus::Unpaid => Msg::Unpaid,
        BillStatus::Partial => Msg::Partial,
        BillStatus::Paid => Msg::Settled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locales_translate_titles() {
        assert_eq!(t(Locale::En, Msg::Beds), "Beds");
        assert_eq!(t(Locale::Fr, Msg::Beds), "Lits");
        assert_eq!(t(Locale::Fr, bed_status(BedStatus::Occupied)), "occupé");
    }

    #[test]
    fn locale_parses_from_its_code() {
        assert_eq!("fr".parse::<Locale>().unwrap(), Locale::Fr);
        assert!("de".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::En);
    }
}
