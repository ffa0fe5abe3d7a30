//! One-off backend provisioning: storage bucket, tables and row-level security.
//!
//! Used by the `provision` binary with the service-role key. Every statement
//! is idempotent so the binary can be re-run against a provisioned project.

use postgres::{Client, NoTls};
use thiserror::Error;
use tracing::{debug, info};

use crate::outbound::remote::{RemoteClient, RemoteError};

/// Failures while provisioning the backend.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// The storage API refused or could not be reached.
    #[error("bucket provisioning failed: {0}")]
    Storage(#[from] RemoteError),
    /// The database connection failed.
    #[error("database connection failed: {message}")]
    Connection { message: String },
    /// A DDL statement failed; the whole batch is rolled back.
    #[error("schema statement {index} failed: {message}")]
    Statement { index: usize, message: String },
}

/// What a provisioning run changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisioningReport {
    /// Whether the bucket was created by this run.
    pub bucket_created: bool,
    /// DDL statements executed.
    pub statements_applied: usize,
}

/// Create the public gallery bucket if it is missing.
///
/// Returns `true` when this call created it.
pub async fn ensure_gallery_bucket(
    client: &RemoteClient,
    bucket: &str,
) -> Result<bool, ProvisioningError> {
    let created = client.create_bucket(bucket, true).await?;
    if !created {
        info!(bucket, "gallery bucket already present");
    }
    Ok(created)
}

/// Apply [`SCHEMA_STATEMENTS`] in one transaction.
///
/// Blocking; call from a blocking thread when inside a Tokio runtime.
pub fn apply_schema(database_url: &str) -> Result<usize, ProvisioningError> {
    let mut client = Client::connect(database_url, NoTls).map_err(|error| {
        ProvisioningError::Connection {
            message: error.to_string(),
        }
    })?;
    let mut transaction = client
        .transaction()
        .map_err(|error| ProvisioningError::Connection {
            message: error.to_string(),
        })?;
    for (index, statement) in SCHEMA_STATEMENTS.iter().enumerate() {
        transaction
            .batch_execute(statement)
            .map_err(|error| ProvisioningError::Statement {
                index,
                message: error.to_string(),
            })?;
        debug!(index, "schema statement applied");
    }
    transaction
        .commit()
        .map_err(|error| ProvisioningError::Statement {
            index: SCHEMA_STATEMENTS.len(),
            message: error.to_string(),
        })?;
    info!(statements = SCHEMA_STATEMENTS.len(), "schema applied");
    Ok(SCHEMA_STATEMENTS.len())
}

/// Tables, role helper and row-level-security policies, in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r"DO $$ BEGIN
        CREATE TYPE public.app_role AS ENUM ('admin', 'trainer', 'secretary', 'finance', 'student');
    EXCEPTION WHEN duplicate_object THEN NULL; END $$",
    r"CREATE TABLE IF NOT EXISTS public.profiles (
        id uuid PRIMARY KEY REFERENCES auth.users (id) ON DELETE CASCADE,
        full_name text NOT NULL DEFAULT '',
        phone text,
        address text,
        avatar_url text,
        created_at timestamptz NOT NULL DEFAULT now()
    )",
    r"CREATE TABLE IF NOT EXISTS public.user_roles (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id uuid NOT NULL REFERENCES auth.users (id) ON DELETE CASCADE,
        role public.app_role NOT NULL,
        UNIQUE (user_id, role)
    )",
    r"CREATE OR REPLACE FUNCTION public.has_role(_user_id uuid, _role public.app_role)
    RETURNS boolean LANGUAGE sql STABLE SECURITY DEFINER SET search_path = public AS $$
        SELECT EXISTS (SELECT 1 FROM public.user_roles WHERE user_id = _user_id AND role = _role)
    $$",
    r"CREATE TABLE IF NOT EXISTS public.programs (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        name text NOT NULL,
        description text,
        start_date date,
        end_date date,
        eligibility text[],
        fee numeric(12, 2),
        is_active boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now()
    )",
    r"CREATE TABLE IF NOT EXISTS public.students (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        full_name text NOT NULL,
        date_of_birth date NOT NULL,
        gender text NOT NULL,
        email text NOT NULL,
        phone text NOT NULL,
        address text NOT NULL,
        guardian_name text,
        program_id uuid REFERENCES public.programs (id),
        education_level text NOT NULL,
        status text NOT NULL DEFAULT 'active',
        created_at timestamptz NOT NULL DEFAULT now()
    )",
    r"CREATE TABLE IF NOT EXISTS public.classes (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        program_id uuid REFERENCES public.programs (id),
        trainer_id uuid REFERENCES auth.users (id),
        name text NOT NULL,
        schedule text,
        is_active boolean NOT NULL DEFAULT true
    )",
    r"CREATE TABLE IF NOT EXISTS public.attendance (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        student_id uuid NOT NULL REFERENCES public.students (id) ON DELETE CASCADE,
        class_id uuid REFERENCES public.classes (id),
        date date NOT NULL,
        status text NOT NULL CHECK (status IN ('present', 'absent'))
    )",
    r"CREATE TABLE IF NOT EXISTS public.payments (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        student_id uuid NOT NULL REFERENCES public.students (id) ON DELETE CASCADE,
        amount numeric(12, 2) NOT NULL,
        status text NOT NULL CHECK (status IN ('paid', 'pending', 'overdue')),
        payment_date date NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS public.salaries (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        staff_id uuid NOT NULL REFERENCES auth.users (id),
        amount numeric(12, 2) NOT NULL,
        month date NOT NULL,
        status text NOT NULL DEFAULT 'pending'
    )",
    r"CREATE TABLE IF NOT EXISTS public.notices (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        title text NOT NULL,
        content text,
        category text NOT NULL DEFAULT 'general',
        is_holiday boolean NOT NULL DEFAULT false,
        holiday_date date,
        is_active boolean NOT NULL DEFAULT true,
        is_public boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now()
    )",
    r"CREATE TABLE IF NOT EXISTS public.vacancies (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        title text NOT NULL,
        description text,
        department text,
        position_type text NOT NULL,
        salary_min numeric(12, 2),
        salary_max numeric(12, 2),
        location text,
        deadline date,
        is_active boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now()
    )",
    r"CREATE TABLE IF NOT EXISTS public.job_applications (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        vacancy_id uuid NOT NULL REFERENCES public.vacancies (id) ON DELETE CASCADE,
        full_name text NOT NULL,
        email text NOT NULL,
        phone text NOT NULL,
        resume text NOT NULL,
        cover_letter text,
        status text NOT NULL DEFAULT 'pending',
        created_at timestamptz NOT NULL DEFAULT now()
    )",
    r"CREATE TABLE IF NOT EXISTS public.gallery (
        id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
        title text NOT NULL,
        description text,
        file_url text NOT NULL,
        type text NOT NULL CHECK (type IN ('image', 'video')),
        tags text[],
        is_public boolean NOT NULL DEFAULT true,
        created_at timestamptz NOT NULL DEFAULT now()
    )",
    r"DO $$
    DECLARE t text;
    BEGIN
        FOREACH t IN ARRAY ARRAY['profiles', 'user_roles', 'programs', 'students', 'classes',
            'attendance', 'payments', 'salaries', 'notices', 'vacancies', 'job_applications',
            'gallery']
        LOOP
            EXECUTE format('ALTER TABLE public.%I ENABLE ROW LEVEL SECURITY', t);
        END LOOP;
    END $$",
    r"DROP POLICY IF EXISTS profiles_own ON public.profiles;
    CREATE POLICY profiles_own ON public.profiles FOR SELECT USING (auth.uid() = id)",
    r"DROP POLICY IF EXISTS user_roles_own ON public.user_roles;
    CREATE POLICY user_roles_own ON public.user_roles FOR SELECT USING (auth.uid() = user_id)",
    r"DROP POLICY IF EXISTS programs_public ON public.programs;
    CREATE POLICY programs_public ON public.programs FOR SELECT USING (is_active)",
    r"DROP POLICY IF EXISTS notices_public ON public.notices;
    CREATE POLICY notices_public ON public.notices FOR SELECT USING (is_active AND is_public)",
    r"DROP POLICY IF EXISTS vacancies_public ON public.vacancies;
    CREATE POLICY vacancies_public ON public.vacancies FOR SELECT USING (is_active)",
    r"DROP POLICY IF EXISTS gallery_public ON public.gallery;
    CREATE POLICY gallery_public ON public.gallery FOR SELECT USING (is_public)",
    r"DROP POLICY IF EXISTS gallery_admin_insert ON public.gallery;
    CREATE POLICY gallery_admin_insert ON public.gallery FOR INSERT
        WITH CHECK (public.has_role(auth.uid(), 'admin'))",
    r"DROP POLICY IF EXISTS applications_anyone_insert ON public.job_applications;
    CREATE POLICY applications_anyone_insert ON public.job_applications FOR INSERT WITH CHECK (true)",
    r"DROP POLICY IF EXISTS students_anyone_register ON public.students;
    CREATE POLICY students_anyone_register ON public.students FOR INSERT WITH CHECK (true)",
    r"DROP POLICY IF EXISTS students_staff_read ON public.students;
    CREATE POLICY students_staff_read ON public.students FOR SELECT USING (
        public.has_role(auth.uid(), 'admin') OR public.has_role(auth.uid(), 'secretary')
        OR public.has_role(auth.uid(), 'trainer') OR public.has_role(auth.uid(), 'finance'))",
    r"DROP POLICY IF EXISTS classes_staff_read ON public.classes;
    CREATE POLICY classes_staff_read ON public.classes FOR SELECT USING (auth.uid() IS NOT NULL)",
    r"DROP POLICY IF EXISTS attendance_staff ON public.attendance;
    CREATE POLICY attendance_staff ON public.attendance FOR ALL USING (
        public.has_role(auth.uid(), 'admin') OR public.has_role(auth.uid(), 'trainer')
        OR public.has_role(auth.uid(), 'secretary'))",
    r"DROP POLICY IF EXISTS payments_finance ON public.payments;
    CREATE POLICY payments_finance ON public.payments FOR ALL USING (
        public.has_role(auth.uid(), 'admin') OR public.has_role(auth.uid(), 'finance'))",
    r"DROP POLICY IF EXISTS salaries_finance ON public.salaries;
    CREATE POLICY salaries_finance ON public.salaries FOR ALL USING (
        public.has_role(auth.uid(), 'admin') OR public.has_role(auth.uid(), 'finance'))",
];
