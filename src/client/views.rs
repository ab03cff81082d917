//! Text renderings of the console pages. Each function takes already-fetched
//! API data and returns the finished block, header line included.

use std::fmt::Write;

use super::i18n::{self, t, Locale, Msg};
use super::session::SessionStore;
use crate::domain::billing::format_cents;
use crate::domain::rbac::{self, Permission};
use crate::models::{
    Admission, AppointmentStatus, Bed, BedStatus, Bill, BillStatus, DashboardStats, MedicalStaff,
    Medicine, Patient, PatientRecord, QueueEntry, Transaction, TreasurySummary, UserProfile,
};

text_enum! {
    pub enum Theme {
        Light => "light",
        Dark => "dark",
        Plain => "plain",
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Busy,
    Warn,
    Muted,
}

impl Theme {
    fn code(&self, tone: Tone) -> Option<&'static str> {
        match (self, tone) {
            (Theme::Plain, _) => None,
            (Theme::Light, Tone::Good) => Some("32"),
            (Theme::Light, Tone::Busy) => Some("34"),
            (Theme::Light, Tone::Warn) => Some("31"),
            (Theme::Light, Tone::Muted) => Some("90"),
            (Theme::Dark, Tone::Good) => Some("92"),
            (Theme::Dark, Tone::Busy) => Some("96"),
            (Theme::Dark, Tone::Warn) => Some("91"),
            (Theme::Dark, Tone::Muted) => Some("37"),
        }
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        match self.code(tone) {
            Some(code) => format!("\x1b[{}m{}\x1b[0m", code, text),
            None => text.to_string(),
        }
    }
}

/// Locale, theme and signed-in user, as read from the session.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub locale: Locale,
    pub theme: Theme,
    pub user: Option<&'a UserProfile>,
}

impl<'a> ViewContext<'a> {
    pub fn from_session(session: &'a SessionStore) -> Self {
        let preferences = session.preferences();
        Self {
            locale: preferences.locale,
            theme: preferences.theme,
            user: session.user(),
        }
    }

    fn t(&self, msg: Msg) -> &'static str {
        t(self.locale, msg)
    }
}

/// `<title> · <user> (<role>)`, or just the title when signed out.
pub fn header(ctx: &ViewContext<'_>, title: Msg) -> String {
    match ctx.user {
        Some(user) => format!("{} · {} ({})", ctx.t(title), user.username, user.role),
        None => ctx.t(title).to_string(),
    }
}

struct Cell {
    text: String,
    tone: Option<Tone>,
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell { text, tone: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell {
            text: text.to_string(),
            tone: None,
        }
    }
}

fn toned(text: &str, tone: Tone) -> Cell {
    Cell {
        text: text.to_string(),
        tone: Some(tone),
    }
}

fn opt(value: Option<impl ToString>) -> Cell {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()).into()
}

/// Column widths are measured on the plain text so color codes never skew
/// the alignment.
fn table(ctx: &ViewContext<'_>, headers: &[Msg], rows: Vec<Vec<Cell>>) -> String {
    if rows.is_empty() {
        return format!("{}\n", ctx.t(Msg::Empty));
    }

    let headers: Vec<&str> = headers.iter().map(|h| ctx.t(*h)).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.text.chars().count());
        }
    }

    let mut out = String::new();
    let line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let padded = pad(&cell.text, *w);
                match cell.tone {
                    Some(tone) => ctx.theme.paint(&padded, tone),
                    None => padded,
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn page(ctx: &ViewContext<'_>, title: Msg, body: String) -> String {
    format!("{}\n\n{}", header(ctx, title), body)
}

fn appointment_tone(status: AppointmentStatus) -> Tone {
    match status {
        AppointmentStatus::Waiting => Tone::Warn,
        AppointmentStatus::InProgress => Tone::Busy,
        AppointmentStatus::Completed => Tone::Good,
        AppointmentStatus::Cancelled => Tone::Muted,
    }
}

fn bed_tone(status: BedStatus) -> Tone {
    match status {
        BedStatus::Available => Tone::Good,
        BedStatus::Reserved | BedStatus::Occupied => Tone::Busy,
        BedStatus::Cleaning => Tone::Warn,
        BedStatus::Maintenance => Tone::Muted,
    }
}

fn bill_tone(status: BillStatus) -> Tone {
    match status {
        BillStatus::Paid => Tone::Good,
        BillStatus::Partial => Tone::Busy,
        BillStatus::Unpaid => Tone::Warn,
    }
}

pub fn patients(ctx: &ViewContext<'_>, patients: &[Patient]) -> String {
    let rows = patients
        .iter()
        .map(|p| {
            vec![
                p.id.to_string().into(),
                p.full_name().into(),
                opt(p.date_of_birth),
                opt(p.phone.as_deref()),
            ]
        })
        .collect();
    page(
        ctx,
        Msg::Patients,
        table(ctx, &[Msg::Id, Msg::Name, Msg::DateOfBirth, Msg::Phone], rows),
    )
}

pub fn queue(ctx: &ViewContext<'_>, entries: &[QueueEntry]) -> String {
    let rows = entries
        .iter()
        .map(|entry| {
            let a = &entry.appointment;
            vec![
                entry.position.to_string().into(),
                a.id.to_string().into(),
                entry.patient_name.as_str().into(),
                a.scheduled_at.format("%Y-%m-%d %H:%M").to_string().into(),
                toned(
                    ctx.t(i18n::appointment_status(a.status)),
                    appointment_tone(a.status),
                ),
                a.payment_status.as_str().into(),
                format_cents(a.fee).into(),
            ]
        })
        .collect();
    page(
        ctx,
        Msg::Queue,
        table(
            ctx,
            &[
                Msg::Position,
                Msg::Id,
                Msg::Patient,
                Msg::Scheduled,
                Msg::Status,
                Msg::Payment,
                Msg::Fee,
            ],
            rows,
        ),
    )
}

pub fn beds(ctx: &ViewContext<'_>, beds: &[Bed]) -> String {
    let rows = beds
        .iter()
        .map(|b| {
            vec![
                b.id.to_string().into(),
                b.label.as_str().into(),
                b.ward.as_str().into(),
                toned(ctx.t(i18n::bed_status(b.status)), bed_tone(b.status)),
                format_cents(b.daily_rate).into(),
            ]
        })
        .collect();
    page(
        ctx,
        Msg::Beds,
        table(
            ctx,
            &[Msg::Id, Msg::Label, Msg::Ward, Msg::Status, Msg::DailyRate],
            rows,
        ),
    )
}

pub fn admissions(ctx: &ViewContext<'_>, admissions: &[Admission]) -> String {
    page(ctx, Msg::Admissions, admission_table(ctx, admissions))
}

fn admission_table(ctx: &ViewContext<'_>, admissions: &[Admission]) -> String {
    let rows = admissions
        .iter()
        .map(|a| {
            vec![
                a.id.to_string().into(),
                a.patient_id.to_string().into(),
                a.bed_id.to_string().into(),
                a.admitted_at.format("%Y-%m-%d %H:%M").to_string().into(),
                opt(a.discharged_at.map(|d| d.format("%Y-%m-%d %H:%M"))),
            ]
        })
        .collect();
    table(
        ctx,
        &[Msg::Id, Msg::Patient, Msg::Label, Msg::Admitted, Msg::Discharged],
        rows,
    )
}

pub fn bills(ctx: &ViewContext<'_>, bills: &[Bill]) -> String {
    page(ctx, Msg::Billing, bill_table(ctx, bills))
}

fn bill_table(ctx: &ViewContext<'_>, bills: &[Bill]) -> String {
    let rows = bills
        .iter()
        .map(|b| {
            vec![
                b.id.to_string().into(),
                b.patient_id.to_string().into(),
                toned(ctx.t(i18n::bill_status(b.status)), bill_tone(b.status)),
                format_cents(b.total).into(),
                format_cents(b.paid_amount).into(),
                format_cents(b.outstanding()).into(),
            ]
        })
        .collect();
    table(
        ctx,
        &[
            Msg::Id,
            Msg::Patient,
            Msg::Status,
            Msg::Total,
            Msg::Paid,
            Msg::Outstanding,
        ],
        rows,
    )
}

pub fn transactions(ctx: &ViewContext<'_>, transactions: &[Transaction]) -> String {
    let rows = transactions
        .iter()
        .map(|tx| {
            vec![
                tx.id.to_string().into(),
                tx.bill_id.to_string().into(),
                tx.method.as_str().into(),
                format_cents(tx.amount).into(),
                tx.created_at.format("%Y-%m-%d %H:%M").to_string().into(),
            ]
        })
        .collect();
    page(
        ctx,
        Msg::Transactions,
        table(
            ctx,
            &[Msg::Id, Msg::Bill, Msg::Method, Msg::Amount, Msg::Date],
            rows,
        ),
    )
}

pub fn treasury(ctx: &ViewContext<'_>, summary: &TreasurySummary) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "{}: {}", ctx.t(Msg::Total), format_cents(summary.total_billed));
    let _ = writeln!(body, "{}: {}", ctx.t(Msg::Paid), format_cents(summary.total_collected));
    let _ = writeln!(
        body,
        "{}: {} ({})",
        ctx.t(Msg::Outstanding),
        format_cents(summary.outstanding),
        summary.unpaid_bills
    );
    let _ = writeln!(body);
    let rows = summary
        .by_method
        .iter()
        .map(|m| {
            vec![
                m.method.as_str().into(),
                format_cents(m.amount).into(),
                m.count.to_string().into(),
            ]
        })
        .collect();
    body.push_str(&table(ctx, &[Msg::Method, Msg::Amount, Msg::Transactions], rows));
    page(ctx, Msg::Billing, body)
}

pub fn staff(ctx: &ViewContext<'_>, staff: &[MedicalStaff]) -> String {
    let rows = staff
        .iter()
        .map(|s| {
            vec![
                s.id.to_string().into(),
                s.full_name().into(),
                s.role.as_str().into(),
                opt(s.department.as_deref()),
                if s.active {
                    toned("yes", Tone::Good)
                } else {
                    toned("no", Tone::Muted)
                },
            ]
        })
        .collect();
    page(
        ctx,
        Msg::Staff,
        table(
            ctx,
            &[Msg::Id, Msg::Name, Msg::Role, Msg::Department, Msg::Active],
            rows,
        ),
    )
}

pub fn medicines(ctx: &ViewContext<'_>, medicines: &[Medicine]) -> String {
    let rows = medicines
        .iter()
        .map(|m| {
            let stock = m.stock.to_string();
            vec![
                m.id.to_string().into(),
                m.name.as_str().into(),
                opt(m.strength.as_deref()),
                if m.is_low_stock() {
                    toned(&stock, Tone::Warn)
                } else {
                    stock.into()
                },
                format_cents(m.unit_price).into(),
            ]
        })
        .collect();
    page(
        ctx,
        Msg::Pharmacy,
        table(
            ctx,
            &[Msg::Id, Msg::Medicine, Msg::Strength, Msg::Stock, Msg::UnitPrice],
            rows,
        ),
    )
}

pub fn record(ctx: &ViewContext<'_>, record: &PatientRecord) -> String {
    let p = &record.patient;
    let mut body = String::new();
    let _ = writeln!(body, "{} #{}: {}", ctx.t(Msg::Patient), p.id, p.full_name());
    if let Some(dob) = p.date_of_birth {
        let _ = writeln!(body, "{}: {}", ctx.t(Msg::DateOfBirth), dob);
    }
    if let Some(group) = &p.blood_group {
        let _ = writeln!(body, "{}", group);
    }

    let _ = writeln!(body, "\n{}", ctx.t(Msg::Queue));
    let rows = record
        .appointments
        .iter()
        .map(|a| {
            vec![
                a.id.to_string().into(),
                a.scheduled_at.format("%Y-%m-%d %H:%M").to_string().into(),
                toned(
                    ctx.t(i18n::appointment_status(a.status)),
                    appointment_tone(a.status),
                ),
                opt(a.reason.as_deref()),
            ]
        })
        .collect();
    body.push_str(&table(
        ctx,
        &[Msg::Id, Msg::Scheduled, Msg::Status, Msg::Reason],
        rows,
    ));

    let _ = writeln!(body, "\n{}", ctx.t(Msg::Admissions));
    body.push_str(&admission_table(ctx, &record.admissions));
    let _ = writeln!(body, "\n{}", ctx.t(Msg::Billing));
    body.push_str(&bill_table(ctx, &record.bills));
    page(ctx, Msg::Records, body)
}

pub fn dashboard(ctx: &ViewContext<'_>, stats: &DashboardStats) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "{}: {}", ctx.t(Msg::Patients), stats.patients);
    let _ = writeln!(
        body,
        "{}: {} {}, {} {}",
        ctx.t(Msg::Queue),
        stats.waiting,
        ctx.t(Msg::Waiting),
        stats.in_progress,
        ctx.t(Msg::InProgress)
    );
    let beds: Vec<String> = stats
        .beds
        .iter()
        .map(|c| {
            let label = format!("{} {}", c.count, ctx.t(i18n::bed_status(c.status)));
            ctx.theme.paint(&label, bed_tone(c.status))
        })
        .collect();
    let _ = writeln!(body, "{}: {}", ctx.t(Msg::Beds), beds.join(", "));
    let _ = writeln!(
        body,
        "{}: {}",
        ctx.t(Msg::Outstanding),
        format_cents(stats.outstanding)
    );
    if !stats.low_stock.is_empty() {
        let names: Vec<&str> = stats.low_stock.iter().map(|m| m.name.as_str()).collect();
        let _ = writeln!(
            body,
            "{}: {}",
            ctx.t(Msg::LowStock),
            ctx.theme.paint(&names.join(", "), Tone::Warn)
        );
    }
    page(ctx, Msg::Dashboard, body)
}

pub fn profile(ctx: &ViewContext<'_>, user: &UserProfile) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "{}: {}", ctx.t(Msg::Name), user.username);
    let _ = writeln!(body, "{}: {}", ctx.t(Msg::Role), user.role);
    let _ = writeln!(body, "\n{}:", ctx.t(Msg::Actions));
    for permission in &user.permissions {
        let _ = writeln!(body, "  {}", permission);
    }
    page(ctx, Msg::Profile, body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Patients,
    Queue,
    Beds,
    Billing,
    Staff,
    Pharmacy,
}

fn page_actions(page: Page) -> &'static [(Msg, Permission)] {
    match page {
        Page::Patients => &[(Msg::RegisterPatient, Permission::ManagePatients)],
        Page::Queue => &[
            (Msg::BookAppointment, Permission::ManageAppointments),
            (Msg::StartConsultation, Permission::RunConsultations),
            (Msg::CompleteConsultation, Permission::RunConsultations),
            (Msg::CancelAppointment, Permission::ManageAppointments),
            (Msg::TakePayment, Permission::ManageAppointments),
            (Msg::TakePayment, Permission::ManageBilling),
        ],
        Page::Beds => &[(Msg::ChangeBedStatus, Permission::ManageBeds)],
        Page::Billing => &[
            (Msg::CreateBill, Permission::ManageBilling),
            (Msg::RecordPayment, Permission::ManageBilling),
        ],
        Page::Staff => &[
            (Msg::HireStaff, Permission::ManageStaff),
            (Msg::CreateAccount, Permission::ManageStaff),
        ],
        Page::Pharmacy => &[
            (Msg::AddMedicine, Permission::ManagePharmacy),
            (Msg::Restock, Permission::ManagePharmacy),
            (Msg::Dispense, Permission::DispenseMedicine),
        ],
    }
}

/// The actions of `page` the signed-in role may see. Signed-out users see none.
pub fn visible_actions(user: Option<&UserProfile>, page: Page) -> Vec<Msg> {
    let Some(user) = user else {
        return Vec::new();
    };
    let mut visible = Vec::new();
    for (msg, permission) in page_actions(page) {
        if rbac::can(user.role, *permission) && !visible.contains(msg) {
            visible.push(*msg);
        }
    }
    visible
}

/// Appends the action footer to a rendered page.
pub fn with_actions(ctx: &ViewContext<'_>, rendered: String, page: Page) -> String {
    let actions = visible_actions(ctx.user, page);
    if actions.is_empty() {
        return rendered;
    }
    let labels: Vec<&str> = actions.iter().map(|a| ctx.t(*a)).collect();
    format!("{}\n{}: {}\n", rendered, ctx.t(Msg::Actions), labels.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn user(role: Role) -> UserProfile {
        UserProfile {
            id: 1,
            username: "sam".to_string(),
            role,
            staff_id: None,
            permissions: rbac::permissions(role).to_vec(),
        }
    }

    fn bed(label: &str, status: BedStatus) -> Bed {
        Bed {
            id: 1,
            label: label.to_string(),
            ward: "General".to_string(),
            status,
            daily_rate: 5000,
            reserved_for: None,
        }
    }

    #[test]
    fn header_names_user_and_role() {
        let profile = user(Role::Nurse);
        let ctx = ViewContext {
            locale: Locale::En,
            theme: Theme::Plain,
            user: Some(&profile),
        };
        assert_eq!(header(&ctx, Msg::Beds), "Beds · sam (nurse)");
    }

    #[test]
    fn plain_theme_has_no_escape_codes() {
        let ctx = ViewContext {
            locale: Locale::En,
            theme: Theme::Plain,
            user: None,
        };
        let out = beds(&ctx, &[bed("A-1", BedStatus::Occupied)]);
        assert!(!out.contains('\x1b'));
        assert!(out.contains("occupied"));
        assert!(out.contains("50.00"));
    }

    #[test]
    fn colored_theme_paints_status() {
        let ctx = ViewContext {
            locale: Locale::Fr,
            theme: Theme::Dark,
            user: None,
        };
        let out = beds(&ctx, &[bed("A-1", BedStatus::Available)]);
        assert!(out.contains("\x1b[92m"));
        assert!(out.contains("disponible"));
    }

    #[test]
    fn columns_line_up() {
        let ctx = ViewContext {
            locale: Locale::En,
            theme: Theme::Plain,
            user: None,
        };
        let out = beds(
            &ctx,
            &[bed("A-1", BedStatus::Available), bed("ICU-12", BedStatus::Cleaning)],
        );
        let lines: Vec<&str> = out.lines().skip(2).collect();
        let ward_col: Vec<usize> = lines.iter().filter_map(|l| l.find("General")).collect();
        assert_eq!(ward_col.len(), 2);
        assert_eq!(ward_col[0], ward_col[1]);
    }

    #[test]
    fn empty_list_says_so() {
        let ctx = ViewContext {
            locale: Locale::En,
            theme: Theme::Light,
            user: None,
        };
        assert!(patients(&ctx, &[]).contains("Nothing to show"));
    }

    #[test]
    fn actions_follow_the_role() {
        let receptionist = user(Role::Receptionist);
        let doctor = user(Role::Doctor);

        let front_desk = visible_actions(Some(&receptionist), Page::Queue);
        assert!(front_desk.contains(&Msg::BookAppointment));
        assert!(front_desk.contains(&Msg::TakePayment));
        assert!(!front_desk.contains(&Msg::StartConsultation));

        let clinic = visible_actions(Some(&doctor), Page::Queue);
        assert_eq!(clinic, vec![Msg::StartConsultation, Msg::CompleteConsultation]);

        assert!(visible_actions(Some(&doctor), Page::Billing).is_empty());
        assert!(visible_actions(None, Page::Patients).is_empty());
    }

    #[test]
    fn admin_sees_take_payment_once() {
        let admin = user(Role::Admin);
        let actions = visible_actions(Some(&admin), Page::Queue);
        assert_eq!(actions.iter().filter(|a| **a == Msg::TakePayment).count(), 1);
    }

    #[test]
    fn queue_renders_position_and_name() {
        use crate::models::{Appointment, PaymentStatus};
        let ctx = ViewContext {
            locale: Locale::En,
            theme: Theme::Plain,
            user: None,
        };
        let entry = QueueEntry {
            position: 1,
            group: 1,
            patient_name: "Ada Obi".to_string(),
            appointment: Appointment {
                id: 7,
                patient_id: 3,
                staff_id: 2,
                scheduled_at: Utc::now(),
                reason: None,
                status: AppointmentStatus::Waiting,
                payment_status: PaymentStatus::Paid,
                fee: 2500,
                created_at: Utc::now(),
                started_at: None,
                completed_at: None,
            },
        };
        let out = queue(&ctx, &[entry]);
        assert!(out.contains("Ada Obi"));
        assert!(out.contains("25.00"));
        assert!(out.starts_with("Waiting queue"));
    }
}
