//! Diesel schema for task persistence.

diesel::table! {
    /// Task records scoped by owner.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// `ending` or `endless`.
        #[max_length = 16]
        task_type -> Varchar,
        /// Impact as of `last_updated`.
        impact -> Float8,
        /// Effort in hours.
        effort -> Float8,
        /// Impact growth per outstanding hour.
        not_doing_hourly_rate -> Float8,
        /// Rate-mode decay per logged hour (endless tasks).
        doing_hourly_rate -> Nullable<Float8>,
        /// Set-to-mode reset value (endless tasks).
        impact_set_to -> Nullable<Float8>,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last impact materialization timestamp.
        last_updated -> Timestamptz,
        /// Completion timestamp (ending tasks).
        completed_at -> Nullable<Timestamptz>,
        /// Optimistic concurrency revision.
        revision -> Int8,
    }
}

diesel::table! {
    /// Time spent on tasks.
    task_logs (id) {
        /// Log identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Logging timestamp.
        logged_at -> Timestamptz,
        /// Logged duration in minutes.
        duration_minutes -> Int4,
    }
}

diesel::joinable!(task_logs -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_logs);
