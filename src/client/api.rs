use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::session::SessionStore;
use super::ClientError;
use crate::models::{
    Admission, AdmissionQuery, Appointment, AppointmentForm, AppointmentQuery, AppointmentStatus,
    Bed, BedForm, BedStatusForm, Bill, BillForm, BillItemForm, BillQuery,
    ConsultationPaymentForm, CreateUserForm, DashboardStats, DataResponse, DispenseForm,
    LoginForm, LoginResponse, MedicalStaff, Medicine, MedicineForm, MedicineQuery, Patient,
    PatientForm, PatientQuery, PatientRecord, PatientUpdateForm, PaymentForm, QueueEntry,
    QueueQuery, RecordQuery, RestockForm, StaffForm, StaffUpdateForm, StatusUpdateForm,
    SystemStatus, Transaction, TreasurySummary, UserProfile,
};

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

/// One call per endpoint. Requests go out one at a time, with the stored
/// bearer token; a `401` signs the session out.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotLoggedIn)?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn error_from(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(text) => serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .unwrap_or(text),
            Err(e) => e.to_string(),
        };
        ClientError::Api { status, message }
    }

    async fn send<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("Server rejected the session token; signing out");
            self.session.clear_auth()?;
            return Err(ClientError::SessionExpired);
        }
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: DataResponse<T> = response.json().await?;
        Ok(body.data)
    }

    async fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, ClientError> {
        let request = self.request(Method::GET, path)?;
        self.send(request).await
    }

    async fn get_query<T: DeserializeOwned, Q: Serialize>(
        &mut self,
        path: &str,
        query: &Q,
    ) -> Result<T, ClientError> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request).await
    }

    async fn write<T: DeserializeOwned, B: Serialize>(
        &mut self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.request(method, path)?.json(body);
        self.send(request).await
    }

    /// Exchanges credentials for a token and stores it with the profile.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(self.url("/login")).json(&form).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let login: LoginResponse = response.json().await?;
        self.session.set_auth(login.token, login.user.clone())?;
        Ok(login.user)
    }

    /// Tokens are stateless, so the local session is cleared even if the
    /// server cannot be reached.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if let Err(e) = self.http.post(self.url("/logout")).send().await {
            tracing::debug!("Logout request failed: {}", e);
        }
        self.session.clear_auth()
    }

    pub async fn me(&mut self) -> Result<UserProfile, ClientError> {
        self.get("/me").await
    }

    pub async fn dashboard(&mut self) -> Result<DashboardStats, ClientError> {
        self.get("/dashboard").await
    }

    pub async fn system_status(&self) -> Result<SystemStatus, ClientError> {
        let response = self.http.get(self.url("/system/status")).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let body: DataResponse<SystemStatus> = response.json().await?;
        Ok(body.data)
    }

    // Patients

    pub async fn list_patients(&mut self) -> Result<Vec<Patient>, ClientError> {
        self.get("/patients").await
    }

    pub async fn search_patients(&mut self, term: &str) -> Result<Vec<Patient>, ClientError> {
        let query = PatientQuery {
            search: Some(term.to_string()),
        };
        self.get_query("/patients", &query).await
    }

    pub async fn get_patient(&mut self, id: i64) -> Result<Patient, ClientError> {
        self.get(&format!("/patients/{id}")).await
    }

    pub async fn create_patient(&mut self, form: &PatientForm) -> Result<Patient, ClientError> {
        self.write(Method::POST, "/patients", form).await
    }

    pub async fn update_patient(
        &mut self,
        id: i64,
        form: &PatientUpdateForm,
    ) -> Result<Patient, ClientError> {
        self.write(Method::PATCH, &format!("/patients/{id}"), form).await
    }

    // Appointments

    pub async fn list_appointments(
        &mut self,
        query: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.get_query("/appointments", query).await
    }

    pub async fn queue(&mut self, query: &QueueQuery) -> Result<Vec<QueueEntry>, ClientError> {
        self.get_query("/appointments/queue", query).await
    }

    pub async fn get_appointment(&mut self, id: i64) -> Result<Appointment, ClientError> {
        self.get(&format!("/appointments/{id}")).await
    }

    pub async fn create_appointment(
        &mut self,
        form: &AppointmentForm,
    ) -> Result<Appointment, ClientError> {
        self.write(Method::POST, "/appointments", form).await
    }

    pub async fn set_appointment_status(
        &mut self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        let form = StatusUpdateForm { status };
        self.write(Method::PATCH, &format!("/appointments/{id}/status"), &form)
            .await
    }

    pub async fn pay_appointment(
        &mut self,
        id: i64,
        form: &ConsultationPaymentForm,
    ) -> Result<Appointment, ClientError> {
        self.write(Method::POST, &format!("/appointments/{id}/pay"), form)
            .await
    }

    // Billing

    pub async fn list_bills(&mut self, query: &BillQuery) -> Result<Vec<Bill>, ClientError> {
        self.get_query("/billing", query).await
    }

    pub async fn get_bill(&mut self, id: i64) -> Result<Bill, ClientError> {
        self.get(&format!("/billing/{id}")).await
    }

    pub async fn create_bill(&mut self, form: &BillForm) -> Result<Bill, ClientError> {
        self.write(Method::POST, "/billing", form).await
    }

    pub async fn add_bill_item(&mut self, id: i64, item: &BillItemForm) -> Result<Bill, ClientError> {
        self.write(Method::POST, &format!("/billing/{id}/items"), item)
            .await
    }

    pub async fn pay_bill(&mut self, id: i64, payment: &PaymentForm) -> Result<Bill, ClientError> {
        self.write(Method::POST, &format!("/billing/{id}/payments"), payment)
            .await
    }

    pub async fn transactions(&mut self, bill_id: Option<i64>) -> Result<Vec<Transaction>, ClientError> {
        match bill_id {
            Some(id) => self.get_query("/billing/transactions", &[("bill_id", id)]).await,
            None => self.get("/billing/transactions").await,
        }
    }

    pub async fn treasury_summary(&mut self) -> Result<TreasurySummary, ClientError> {
        self.get("/billing/summary").await
    }

    // Staff

    pub async fn list_staff(&mut self) -> Result<Vec<MedicalStaff>, ClientError> {
        self.get("/staff").await
    }

    pub async fn get_staff(&mut self, id: i64) -> Result<MedicalStaff, ClientError> {
        self.get(&format!("/staff/{id}")).await
    }

    pub async fn create_staff(&mut self, form: &StaffForm) -> Result<MedicalStaff, ClientError> {
        self.write(Method::POST, "/staff", form).await
    }

    pub async fn update_staff(
        &mut self,
        id: i64,
        form: &StaffUpdateForm,
    ) -> Result<MedicalStaff, ClientError> {
        self.write(Method::PATCH, &format!("/staff/{id}"), form).await
    }

    pub async fn create_user(&mut self, form: &CreateUserForm) -> Result<UserProfile, ClientError> {
        self.write(Method::POST, "/users", form).await
    }

    // Medical

    pub async fn beds(&mut self) -> Result<Vec<Bed>, ClientError> {
        self.get("/medical/beds").await
    }

    pub async fn create_bed(&mut self, form: &BedForm) -> Result<Bed, ClientError> {
        self.write(Method::POST, "/medical/beds", form).await
    }

    pub async fn set_bed_status(&mut self, id: i64, form: &BedStatusForm) -> Result<Bed, ClientError> {
        self.write(Method::PATCH, &format!("/medical/beds/{id}/status"), form)
            .await
    }

    pub async fn admissions(&mut self, query: &AdmissionQuery) -> Result<Vec<Admission>, ClientError> {
        self.get_query("/medical/admissions", query).await
    }

    pub async fn medicines(&mut self, query: &MedicineQuery) -> Result<Vec<Medicine>, ClientError> {
        self.get_query("/medical/medicines", query).await
    }

    pub async fn create_medicine(&mut self, form: &MedicineForm) -> Result<Medicine, ClientError> {
        self.write(Method::POST, "/medical/medicines", form).await
    }

    pub async fn dispense(&mut self, id: i64, form: &DispenseForm) -> Result<Medicine, ClientError> {
        self.write(Method::POST, &format!("/medical/medicines/{id}/dispense"), form)
            .await
    }

    pub async fn restock(&mut self, id: i64, quantity: i64) -> Result<Medicine, ClientError> {
        let form = RestockForm { quantity };
        self.write(Method::POST, &format!("/medical/medicines/{id}/restock"), &form)
            .await
    }

    pub async fn search_records(&mut self, term: &str) -> Result<Vec<Patient>, ClientError> {
        let query = RecordQuery { q: term.to_string() };
        self.get_query("/medical/records", &query).await
    }

    pub async fn record(&mut self, patient_id: i64) -> Result<PatientRecord, ClientError> {
        self.get(&format!("/medical/records/{patient_id}")).await
    }
}
