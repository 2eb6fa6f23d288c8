use mockall::mock;
use uuid::Uuid;

use crate::models::{DbMatchRequest, DbSession, DbSlot, DbUser};
use crate::repositories::match_request::{RequestCreateOutcome, TransitionOutcome};
use crate::repositories::slot::SlotWriteOutcome;
use crate::repositories::user::CreateUserOutcome;
use peerslot_core::models::match_request::RequestStatus;
use peerslot_core::models::slot::{SlotDraft, SlotPatch, SlotStatus};

// Mock repositories for testing
mock! {
    pub SlotRepo {
        pub async fn create_slot(
            &self,
            owner_id: Uuid,
            draft: SlotDraft,
            is_recurring: bool,
        ) -> eyre::Result<SlotWriteOutcome>;

        pub async fn update_slot(
            &self,
            slot_id: Uuid,
            owner_id: Uuid,
            patch: SlotPatch,
        ) -> eyre::Result<SlotWriteOutcome>;

        pub async fn delete_slot(
            &self,
            slot_id: Uuid,
            owner_id: Uuid,
        ) -> eyre::Result<SlotWriteOutcome>;

        pub async fn get_slot_by_id(
            &self,
            slot_id: Uuid,
        ) -> eyre::Result<Option<DbSlot>>;

        pub async fn list_slots_by_owner(
            &self,
            owner_id: Uuid,
        ) -> eyre::Result<Vec<DbSlot>>;

        pub async fn list_slots_by_owner_and_status(
            &self,
            owner_id: Uuid,
            status: SlotStatus,
        ) -> eyre::Result<Vec<DbSlot>>;

        pub async fn list_open_slots(
            &self,
            exclude_owner: Uuid,
        ) -> eyre::Result<Vec<DbSlot>>;
    }
}

mock! {
    pub MatchRequestRepo {
        pub async fn create_match_request(
            &self,
            slot_id: Uuid,
            requester_id: Uuid,
        ) -> eyre::Result<RequestCreateOutcome>;

        pub async fn get_match_request_by_id(
            &self,
            request_id: Uuid,
        ) -> eyre::Result<Option<DbMatchRequest>>;

        pub async fn list_pending_for_owner(
            &self,
            owner_id: Uuid,
        ) -> eyre::Result<Vec<DbMatchRequest>>;

        pub async fn transition_request(
            &self,
            request_id: Uuid,
            expected: RequestStatus,
            next: RequestStatus,
            slot_transition: Option<(SlotStatus, SlotStatus)>,
        ) -> eyre::Result<TransitionOutcome>;
    }
}

mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            email: &'static str,
            password_hash: &'static str,
            name: &'static str,
            subjects: Vec<String>,
        ) -> eyre::Result<CreateUserOutcome>;

        pub async fn get_user_by_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_email(
            &self,
            email: &'static str,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_users_by_ids(
            &self,
            user_ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<DbUser>>;

        pub async fn verify_credentials(
            &self,
            email: &'static str,
            password: &'static str,
        ) -> eyre::Result<Option<DbUser>>;
    }
}

mock! {
    pub SessionRepo {
        pub async fn create_session(
            &self,
            user_id: Uuid,
            ttl_days: i64,
        ) -> eyre::Result<DbSession>;

        pub async fn get_session_user(
            &self,
            token: &'static str,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn delete_session(&self, token: &'static str) -> eyre::Result<()>;
    }
}
