use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hospital_admin::client::i18n::{t, Locale, Msg};
use hospital_admin::client::views::{self, Page, Theme, ViewContext};
use hospital_admin::client::{ApiClient, ClientError, Preferences, SessionStore};
use hospital_admin::domain::rbac::{self, Permission};
use hospital_admin::models::{
    AdmissionQuery, AppointmentForm, AppointmentQuery, AppointmentStatus, BedForm, BedStatus,
    BedStatusForm, BillForm, BillItemForm, BillQuery, BillStatus, ConsultationPaymentForm,
    CreateUserForm, DispenseForm, MedicineForm, MedicineQuery, PatientForm, PaymentForm,
    PaymentMethod, QueueQuery, Role, StaffForm, StaffUpdateForm,
};

#[derive(Parser, Debug)]
#[command(name = "hospctl", about = "Hospital administration console")]
struct Cli {
    #[arg(long, env = "HOSPCTL_BASE_URL", default_value = "http://127.0.0.1:5000/api")]
    base_url: String,

    #[arg(long, env = "HOSPCTL_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "HOSPCTL_PASSWORD")]
        password: String,
    },
    Logout,
    Me,
    Dashboard,
    Status,
    Patients(PatientsCommand),
    Queue {
        #[arg(long)]
        staff_id: Option<i64>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Appointment(AppointmentCommand),
    Beds(BedsCommand),
    Billing(BillingCommand),
    Staff(StaffCommand),
    Pharmacy(PharmacyCommand),
    Records(RecordsCommand),
    /// Show or change locale and theme
    Prefs {
        #[arg(long)]
        locale: Option<Locale>,
        #[arg(long)]
        theme: Option<Theme>,
    },
}

#[derive(Args, Debug)]
struct PatientsCommand {
    #[command(subcommand)]
    command: PatientsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PatientsSubcommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        first_name: String,
        last_name: String,
        #[arg(long)]
        dob: Option<NaiveDate>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        national_id: Option<String>,
    },
}

#[derive(Args, Debug)]
struct AppointmentCommand {
    #[command(subcommand)]
    command: AppointmentSubcommand,
}

#[derive(Subcommand, Debug)]
enum AppointmentSubcommand {
    List {
        #[arg(long)]
        patient_id: Option<i64>,
        #[arg(long)]
        staff_id: Option<i64>,
    },
    Book {
        patient_id: i64,
        staff_id: i64,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long)]
        reason: Option<String>,
        /// Consultation fee in cents
        #[arg(long, default_value_t = 0)]
        fee: i64,
    },
    Start {
        id: i64,
    },
    Complete {
        id: i64,
    },
    Cancel {
        id: i64,
    },
    Pay {
        id: i64,
        #[arg(long, default_value = "cash")]
        method: PaymentMethod,
        #[arg(long)]
        reference: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BedsCommand {
    #[command(subcommand)]
    command: BedsSubcommand,
}

#[derive(Subcommand, Debug)]
enum BedsSubcommand {
    List,
    Add {
        label: String,
        ward: String,
        /// Daily rate in cents
        #[arg(long, default_value_t = 0)]
        rate: i64,
    },
    Set {
        id: i64,
        status: BedStatus,
        #[arg(long)]
        patient_id: Option<i64>,
        #[arg(long)]
        staff_id: Option<i64>,
        #[arg(long)]
        reason: Option<String>,
    },
    Admissions {
        #[arg(long)]
        active: bool,
    },
}

#[derive(Args, Debug)]
struct BillingCommand {
    #[command(subcommand)]
    command: BillingSubcommand,
}

#[derive(Subcommand, Debug)]
enum BillingSubcommand {
    List {
        #[arg(long)]
        status: Option<BillStatus>,
        #[arg(long)]
        patient_id: Option<i64>,
    },
    Create {
        patient_id: i64,
        description: String,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        /// Unit price in cents
        #[arg(long)]
        price: i64,
    },
    AddItem {
        bill_id: i64,
        description: String,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        /// Unit price in cents
        #[arg(long)]
        price: i64,
    },
    Pay {
        bill_id: i64,
        /// Amount in cents
        amount: i64,
        #[arg(long, default_value = "cash")]
        method: PaymentMethod,
        #[arg(long)]
        reference: Option<String>,
    },
    Transactions {
        #[arg(long)]
        bill_id: Option<i64>,
    },
    Summary,
}

#[derive(Args, Debug)]
struct StaffCommand {
    #[command(subcommand)]
    command: StaffSubcommand,
}

#[derive(Subcommand, Debug)]
enum StaffSubcommand {
    List,
    Add {
        first_name: String,
        last_name: String,
        role: Role,
        #[arg(long)]
        department: Option<String>,
    },
    Deactivate {
        id: i64,
    },
    CreateUser {
        username: String,
        role: Role,
        #[arg(long, env = "HOSPCTL_NEW_PASSWORD")]
        password: String,
        #[arg(long)]
        staff_id: Option<i64>,
    },
}

#[derive(Args, Debug)]
struct PharmacyCommand {
    #[command(subcommand)]
    command: PharmacySubcommand,
}

#[derive(Subcommand, Debug)]
enum PharmacySubcommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        low_stock: bool,
    },
    Add {
        name: String,
        #[arg(long)]
        strength: Option<String>,
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Unit price in cents
        #[arg(long)]
        price: i64,
        #[arg(long, default_value_t = 10)]
        reorder_level: i64,
    },
    Dispense {
        id: i64,
        quantity: i64,
        #[arg(long)]
        patient_id: Option<i64>,
    },
    Restock {
        id: i64,
        quantity: i64,
    },
}

#[derive(Args, Debug)]
struct RecordsCommand {
    #[command(subcommand)]
    command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
enum RecordsSubcommand {
    Search { term: String },
    Show { patient_id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let path = cli.session_file.clone().unwrap_or_else(SessionStore::default_path);
    let session = match SessionStore::load(&path) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let locale = session.preferences().locale;
    let mut client = ApiClient::new(cli.base_url, session);

    match run(&mut client, cli.command).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", describe(locale, &e));
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ConsoleError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("not allowed")]
    NotAllowed,
}

fn describe(locale: Locale, error: &ConsoleError) -> String {
    match error {
        ConsoleError::NotAllowed => t(locale, Msg::NotAllowed).to_string(),
        ConsoleError::Client(ClientError::SessionExpired) => t(locale, Msg::SessionExpired).to_string(),
        ConsoleError::Client(ClientError::NotLoggedIn) => t(locale, Msg::NotLoggedIn).to_string(),
        ConsoleError::Client(ClientError::Api { message, .. }) => {
            format!("{}: {}", t(locale, Msg::GenericError), message)
        }
        ConsoleError::Client(other) => format!("{}: {}", t(locale, Msg::GenericError), other),
    }
}

/// Refuses locally what the server would reject with 403.
fn require(client: &ApiClient, wanted: &[Permission]) -> Result<(), ConsoleError> {
    let user = client.session().user().ok_or(ClientError::NotLoggedIn)?;
    if rbac::can_any(user.role, wanted) {
        Ok(())
    } else {
        Err(ConsoleError::NotAllowed)
    }
}

async fn run(client: &mut ApiClient, command: Command) -> Result<String, ConsoleError> {
    let locale = client.session().preferences().locale;

    let output = match command {
        Command::Login { username, password } => {
            let user = client.login(&username, &password).await?;
            format!("{}: {} ({})\n", t(locale, Msg::LoggedIn), user.username, user.role)
        }
        Command::Logout => {
            client.logout().await?;
            format!("{}\n", t(locale, Msg::LoggedOut))
        }
        Command::Me => {
            let user = client.me().await?;
            views::profile(&ViewContext::from_session(client.session()), &user)
        }
        Command::Dashboard => {
            let stats = client.dashboard().await?;
            views::dashboard(&ViewContext::from_session(client.session()), &stats)
        }
        Command::Status => {
            let status = client.system_status().await?;
            format!("version {} · database {}\n", status.version, if status.database { "ok" } else { "down" })
        }
        Command::Patients(cmd) => run_patients(client, cmd.command).await?,
        Command::Queue { staff_id, date } => {
            let entries = client.queue(&QueueQuery { staff_id, date }).await?;
            let ctx = ViewContext::from_session(client.session());
            views::with_actions(&ctx, views::queue(&ctx, &entries), Page::Queue)
        }
        Command::Appointment(cmd) => run_appointment(client, cmd.command).await?,
        Command::Beds(cmd) => run_beds(client, cmd.command).await?,
        Command::Billing(cmd) => run_billing(client, cmd.command).await?,
        Command::Staff(cmd) => run_staff(client, cmd.command).await?,
        Command::Pharmacy(cmd) => run_pharmacy(client, cmd.command).await?,
        Command::Records(cmd) => run_records(client, cmd.command).await?,
        Command::Prefs { locale, theme } => {
            let current = client.session().preferences();
            let updated = Preferences {
                locale: locale.unwrap_or(current.locale),
                theme: theme.unwrap_or(current.theme),
            };
            if updated != current {
                client.session_mut().set_preferences(updated)?;
            }
            format!("locale {} · theme {}\n", updated.locale, updated.theme)
        }
    };
    Ok(output)
}

async fn run_patients(client: &mut ApiClient, command: PatientsSubcommand) -> Result<String, ConsoleError> {
    match command {
        PatientsSubcommand::List { search } => {
            let patients = match search {
                Some(term) => client.search_patients(&term).await?,
                None => client.list_patients().await?,
            };
            let ctx = ViewContext::from_session(client.session());
            Ok(views::with_actions(&ctx, views::patients(&ctx, &patients), Page::Patients))
        }
        PatientsSubcommand::Add { first_name, last_name, dob, phone, national_id } => {
            require(client, &[Permission::ManagePatients])?;
            let form = PatientForm {
                first_name,
                last_name,
                date_of_birth: dob,
                gender: None,
                phone,
                address: None,
                national_id,
                blood_group: None,
            };
            let patient = client.create_patient(&form).await?;
            let ctx = ViewContext::from_session(client.session());
            Ok(views::patients(&ctx, &[patient]))
        }
    }
}

async fn run_appointment(client: &mut ApiClient, command: AppointmentSubcommand) -> Result<String, ConsoleError> {
    let appointment = match command {
        AppointmentSubcommand::List { patient_id, staff_id } => {
            let query = AppointmentQuery {
                patient_id,
                staff_id,
                ..Default::default()
            };
            let appointments = client.list_appointments(&query).await?;
            let mut out = String::new();
            for a in appointments {
                out.push_str(&format!(
                    "#{} patient {} staff {} {} {} {}\n",
                    a.id,
                    a.patient_id,
                    a.staff_id,
                    a.scheduled_at.format("%Y-%m-%d %H:%M"),
                    a.status,
                    a.payment_status
                ));
            }
            return Ok(out);
        }
        AppointmentSubcommand::Book { patient_id, staff_id, at, reason, fee } => {
            require(client, &[Permission::ManageAppointments])?;
            let form = AppointmentForm {
                patient_id,
                staff_id,
                scheduled_at: at,
                reason,
                fee,
            };
            client.create_appointment(&form).await?
        }
        AppointmentSubcommand::Start { id } => {
            require(client, &[Permission::RunConsultations])?;
            client.set_appointment_status(id, AppointmentStatus::InProgress).await?
        }
        AppointmentSubcommand::Complete { id } => {
            require(client, &[Permission::RunConsultations])?;
            client.set_appointment_status(id, AppointmentStatus::Completed).await?
        }
        AppointmentSubcommand::Cancel { id } => {
            require(client, &[Permission::ManageAppointments])?;
            client.set_appointment_status(id, AppointmentStatus::Cancelled).await?
        }
        AppointmentSubcommand::Pay { id, method, reference } => {
            require(client, &[Permission::ManageAppointments, Permission::ManageBilling])?;
            client
                .pay_appointment(id, &ConsultationPaymentForm { method, reference })
                .await?
        }
    };
    Ok(format!(
        "#{} {} ({})\n",
        appointment.id, appointment.status, appointment.payment_status
    ))
}

async fn run_beds(client: &mut ApiClient, command: BedsSubcommand) -> Result<String, ConsoleError> {
    let beds = match command {
        BedsSubcommand::List => client.beds().await?,
        BedsSubcommand::Add { label, ward, rate } => {
            require(client, &[Permission::ManageBeds])?;
            vec![client.create_bed(&BedForm { label, ward, daily_rate: rate }).await?]
        }
        BedsSubcommand::Set { id, status, patient_id, staff_id, reason } => {
            require(client, &[Permission::ManageBeds])?;
            let form = BedStatusForm {
                status,
                patient_id,
                staff_id,
                reason,
            };
            vec![client.set_bed_status(id, &form).await?]
        }
        BedsSubcommand::Admissions { active } => {
            let query = AdmissionQuery {
                active: active.then_some(true),
                patient_id: None,
            };
            let admissions = client.admissions(&query).await?;
            let ctx = ViewContext::from_session(client.session());
            return Ok(views::admissions(&ctx, &admissions));
        }
    };
    let ctx = ViewContext::from_session(client.session());
    Ok(views::with_actions(&ctx, views::beds(&ctx, &beds), Page::Beds))
}

async fn run_billing(client: &mut ApiClient, command: BillingSubcommand) -> Result<String, ConsoleError> {
    let bills = match command {
        BillingSubcommand::List { status, patient_id } => {
            client.list_bills(&BillQuery { status, patient_id }).await?
        }
        BillingSubcommand::Create { patient_id, description, quantity, price } => {
            require(client, &[Permission::ManageBilling])?;
            let form = BillForm {
                patient_id,
                appointment_id: None,
                items: vec![BillItemForm {
                    description,
                    quantity,
                    unit_price: price,
                }],
            };
            vec![client.create_bill(&form).await?]
        }
        BillingSubcommand::AddItem { bill_id, description, quantity, price } => {
            require(client, &[Permission::ManageBilling])?;
            let item = BillItemForm {
                description,
                quantity,
                unit_price: price,
            };
            vec![client.add_bill_item(bill_id, &item).await?]
        }
        BillingSubcommand::Pay { bill_id, amount, method, reference } => {
            require(client, &[Permission::ManageBilling])?;
            let payment = PaymentForm {
                amount,
                method,
                reference,
            };
            vec![client.pay_bill(bill_id, &payment).await?]
        }
        BillingSubcommand::Transactions { bill_id } => {
            let transactions = client.transactions(bill_id).await?;
            let ctx = ViewContext::from_session(client.session());
            return Ok(views::transactions(&ctx, &transactions));
        }
        BillingSubcommand::Summary => {
            let summary = client.treasury_summary().await?;
            let ctx = ViewContext::from_session(client.session());
            return Ok(views::treasury(&ctx, &summary));
        }
    };
    let ctx = ViewContext::from_session(client.session());
    Ok(views::with_actions(&ctx, views::bills(&ctx, &bills), Page::Billing))
}

async fn run_staff(client: &mut ApiClient, command: StaffSubcommand) -> Result<String, ConsoleError> {
    let staff = match command {
        StaffSubcommand::List => client.list_staff().await?,
        StaffSubcommand::Add { first_name, last_name, role, department } => {
            require(client, &[Permission::ManageStaff])?;
            let form = StaffForm {
                first_name,
                last_name,
                role,
                department,
                phone: None,
                email: None,
                hired_on: None,
            };
            vec![client.create_staff(&form).await?]
        }
        StaffSubcommand::Deactivate { id } => {
            require(client, &[Permission::ManageStaff])?;
            let form = StaffUpdateForm {
                active: Some(false),
                ..Default::default()
            };
            vec![client.update_staff(id, &form).await?]
        }
        StaffSubcommand::CreateUser { username, role, password, staff_id } => {
            require(client, &[Permission::ManageStaff])?;
            let form = CreateUserForm {
                username,
                password,
                role,
                staff_id,
            };
            let profile = client.create_user(&form).await?;
            return Ok(format!("{} ({})\n", profile.username, profile.role));
        }
    };
    let ctx = ViewContext::from_session(client.session());
    Ok(views::with_actions(&ctx, views::staff(&ctx, &staff), Page::Staff))
}

async fn run_pharmacy(client: &mut ApiClient, command: PharmacySubcommand) -> Result<String, ConsoleError> {
    let medicines = match command {
        PharmacySubcommand::List { search, low_stock } => {
            let query = MedicineQuery {
                search,
                low_stock: low_stock.then_some(true),
            };
            client.medicines(&query).await?
        }
        PharmacySubcommand::Add { name, strength, stock, price, reorder_level } => {
            require(client, &[Permission::ManagePharmacy])?;
            let form = MedicineForm {
                name,
                form: None,
                strength,
                stock,
                unit_price: price,
                reorder_level,
            };
            vec![client.create_medicine(&form).await?]
        }
        PharmacySubcommand::Dispense { id, quantity, patient_id } => {
            require(client, &[Permission::DispenseMedicine])?;
            vec![client.dispense(id, &DispenseForm { quantity, patient_id }).await?]
        }
        PharmacySubcommand::Restock { id, quantity } => {
            require(client, &[Permission::ManagePharmacy])?;
            vec![client.restock(id, quantity).await?]
        }
    };
    let ctx = ViewContext::from_session(client.session());
    Ok(views::with_actions(&ctx, views::medicines(&ctx, &medicines), Page::Pharmacy))
}

async fn run_records(client: &mut ApiClient, command: RecordsSubcommand) -> Result<String, ConsoleError> {
    match command {
        RecordsSubcommand::Search { term } => {
            let patients = client.search_records(&term).await?;
            let ctx = ViewContext::from_session(client.session());
            Ok(views::patients(&ctx, &patients))
        }
        RecordsSubcommand::Show { patient_id } => {
            let record = client.record(patient_id).await?;
            let ctx = ViewContext::from_session(client.session());
            Ok(views::record(&ctx, &record))
        }
    }
}
