//! Per-block configuration payloads
//!
//! Each configurable block type carries one payload shape. Every field is
//! optional so the same struct can describe a master default, a partial
//! preset override, or a resolved instance config. Payloads are plain data:
//! the engine deep-merges them during generation and reads step references
//! out of them for warnings, nothing more.
//!
//! # Merge semantics
//!
//! [`Merge::merge`] combines a base with an override. Leaf values from the
//! override win, nested records merge recursively field by field, and a
//! field set only on one side is taken as is.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::BlockId;

/// Structural merge over a known config shape
pub trait Merge: Sized {
    /// Merge `over` onto `self`, preferring override leaves at every level
    fn merge(self, over: Self) -> Self;

    /// True when no field is set
    fn is_empty(&self) -> bool;
}

fn leaf<T>(base: Option<T>, over: Option<T>) -> Option<T> {
    over.or(base)
}

fn nested<T: Merge>(base: Option<T>, over: Option<T>) -> Option<T> {
    match (base, over) {
        (Some(base), Some(over)) => Some(base.merge(over)),
        (base, over) => over.or(base),
    }
}

// =============================================================================
// Shared enums
// =============================================================================

/// Who gets offered an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStrategy {
    Manual,
    All,
    ProjectTeams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitMode {
    Single,
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeratorType {
    Internal,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationOutcome {
    Approve,
    Revision,
    Reject,
}

/// Where a rejected moderation sends the order
///
/// Serialized as the `CANCEL_ORDER` sentinel or a bare block id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RejectTarget {
    CancelOrder,
    Step(BlockId),
}

impl RejectTarget {
    pub const CANCEL_ORDER: &'static str = "CANCEL_ORDER";
}

impl From<String> for RejectTarget {
    fn from(value: String) -> Self {
        if value == Self::CANCEL_ORDER {
            Self::CancelOrder
        } else {
            Self::Step(value)
        }
    }
}

impl From<RejectTarget> for String {
    fn from(value: RejectTarget) -> Self {
        match value {
            RejectTarget::CancelOrder => RejectTarget::CANCEL_ORDER.to_string(),
            RejectTarget::Step(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Email,
    Sms,
    App,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenameMode {
    Manual,
    Auto,
    Template,
}

// =============================================================================
// Payload shapes
// =============================================================================

/// Slot count and default duration for one kind of pro
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShootSlots {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_duration_minutes: Option<u32>,
}

impl Merge for ShootSlots {
    fn merge(self, over: Self) -> Self {
        Self {
            count: leaf(self.count, over.count),
            default_duration_minutes: leaf(
                self.default_duration_minutes,
                over.default_duration_minutes,
            ),
        }
    }

    fn is_empty(&self) -> bool {
        self.count.is_none() && self.default_duration_minutes.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProAssigningConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<AssignmentStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_confirmation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photographers: Option<ShootSlots>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videographers: Option<ShootSlots>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_client: Option<bool>,
    /// 1–5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pro_level: Option<u8>,
}

impl Merge for ProAssigningConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            strategy: leaf(self.strategy, over.strategy),
            welcome_text: leaf(self.welcome_text, over.welcome_text),
            require_confirmation: leaf(self.require_confirmation, over.require_confirmation),
            photographers: nested(self.photographers, over.photographers),
            videographers: nested(self.videographers, over.videographers),
            visible_to_client: leaf(self.visible_to_client, over.visible_to_client),
            min_pro_level: leaf(self.min_pro_level, over.min_pro_level),
        }
    }

    fn is_empty(&self) -> bool {
        self.strategy.is_none()
            && self.welcome_text.is_none()
            && self.require_confirmation.is_none()
            && self.photographers.is_none()
            && self.videographers.is_none()
            && self.visible_to_client.is_none()
            && self.min_pro_level.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetoucherAssigningConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<AssignmentStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_guidelines: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_client: Option<bool>,
    /// 1–5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_retoucher_level: Option<u8>,
}

impl Merge for RetoucherAssigningConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            strategy: leaf(self.strategy, over.strategy),
            welcome_text: leaf(self.welcome_text, over.welcome_text),
            guidelines: leaf(self.guidelines, over.guidelines),
            enforce_guidelines: leaf(self.enforce_guidelines, over.enforce_guidelines),
            visible_to_client: leaf(self.visible_to_client, over.visible_to_client),
            min_retoucher_level: leaf(self.min_retoucher_level, over.min_retoucher_level),
        }
    }

    fn is_empty(&self) -> bool {
        self.strategy.is_none()
            && self.welcome_text.is_none()
            && self.guidelines.is_none()
            && self.enforce_guidelines.is_none()
            && self.visible_to_client.is_none()
            && self.min_retoucher_level.is_none()
    }
}

/// Photo selection tool settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SstConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_new_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_pack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_mode: Option<SubmitMode>,
    /// Only meaningful in `BULK` mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_photos_per_batch: Option<u32>,
}

impl Merge for SstConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            allow_new_items: leaf(self.allow_new_items, over.allow_new_items),
            domain: leaf(self.domain, over.domain),
            resource_pack: leaf(self.resource_pack, over.resource_pack),
            submit_mode: leaf(self.submit_mode, over.submit_mode),
            min_photos_per_batch: leaf(self.min_photos_per_batch, over.min_photos_per_batch),
        }
    }

    fn is_empty(&self) -> bool {
        self.allow_new_items.is_none()
            && self.domain.is_none()
            && self.resource_pack.is_none()
            && self.submit_mode.is_none()
            && self.min_photos_per_batch.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_type: Option<ModeratorType>,
    /// Roles allowed to moderate when the moderator is internal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<BTreeSet<ModerationOutcome>>,
    /// Block a revision sends the order back to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_revision_step_id: Option<BlockId>,
    /// 0 = unlimited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_revisions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_reject: Option<RejectTarget>,
}

impl Merge for ModerationConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            moderator_type: leaf(self.moderator_type, over.moderator_type),
            allowed_roles: leaf(self.allowed_roles, over.allowed_roles),
            outcomes: leaf(self.outcomes, over.outcomes),
            on_revision_step_id: leaf(self.on_revision_step_id, over.on_revision_step_id),
            max_revisions: leaf(self.max_revisions, over.max_revisions),
            on_reject: leaf(self.on_reject, over.on_reject),
        }
    }

    fn is_empty(&self) -> bool {
        self.moderator_type.is_none()
            && self.allowed_roles.is_none()
            && self.outcomes.is_none()
            && self.on_revision_step_id.is_none()
            && self.max_revisions.is_none()
            && self.on_reject.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IfElseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_path_step_id: Option<BlockId>,
    /// Absent means "continue normally"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_path_step_id: Option<BlockId>,
}

impl Merge for IfElseConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            condition: leaf(self.condition, over.condition),
            true_path_step_id: leaf(self.true_path_step_id, over.true_path_step_id),
            false_path_step_id: leaf(self.false_path_step_id, over.false_path_step_id),
        }
    }

    fn is_empty(&self) -> bool {
        self.condition.is_none()
            && self.true_path_step_id.is_none()
            && self.false_path_step_id.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalProcessConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// JSON template with `{{var}}` placeholders, kept verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_template: Option<String>,
}

impl Merge for ExternalProcessConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            webhook_url: leaf(self.webhook_url, over.webhook_url),
            payload_template: leaf(self.payload_template, over.payload_template),
        }
    }

    fn is_empty(&self) -> bool {
        self.webhook_url.is_none() && self.payload_template.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendNotificationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<NotificationChannel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Merge for SendNotificationConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            channel: leaf(self.channel, over.channel),
            title: leaf(self.title, over.title),
            body: leaf(self.body, over.body),
        }
    }

    fn is_empty(&self) -> bool {
        self.channel.is_none() && self.title.is_none() && self.body.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileStorageConfig {
    /// Retention in days, 0 = indefinite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_life: Option<u32>,
}

impl Merge for FileStorageConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            time_to_life: leaf(self.time_to_life, over.time_to_life),
        }
    }

    fn is_empty(&self) -> bool {
        self.time_to_life.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileRenamingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<RenameMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_time: Option<bool>,
}

impl Merge for FileRenamingConfig {
    fn merge(self, over: Self) -> Self {
        Self {
            mode: leaf(self.mode, over.mode),
            prefix: leaf(self.prefix, over.prefix),
            number_pattern: leaf(self.number_pattern, over.number_pattern),
            include_date: leaf(self.include_date, over.include_date),
            include_time: leaf(self.include_time, over.include_time),
        }
    }

    fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.prefix.is_none()
            && self.number_pattern.is_none()
            && self.include_date.is_none()
            && self.include_time.is_none()
    }
}

// =============================================================================
// Tagged payload
// =============================================================================

/// Discriminant of [`BlockConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigKind {
    ProAssigning,
    RetoucherAssigning,
    Sst,
    Moderation,
    IfElse,
    ExternalProcess,
    SendNotification,
    FileStorage,
    FileRenaming,
}

/// A configuration payload of one of the known shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockConfig {
    ProAssigning(ProAssigningConfig),
    RetoucherAssigning(RetoucherAssigningConfig),
    Sst(SstConfig),
    Moderation(ModerationConfig),
    IfElse(IfElseConfig),
    ExternalProcess(ExternalProcessConfig),
    SendNotification(SendNotificationConfig),
    FileStorage(FileStorageConfig),
    FileRenaming(FileRenamingConfig),
}

impl BlockConfig {
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::ProAssigning(_) => ConfigKind::ProAssigning,
            Self::RetoucherAssigning(_) => ConfigKind::RetoucherAssigning,
            Self::Sst(_) => ConfigKind::Sst,
            Self::Moderation(_) => ConfigKind::Moderation,
            Self::IfElse(_) => ConfigKind::IfElse,
            Self::ExternalProcess(_) => ConfigKind::ExternalProcess,
            Self::SendNotification(_) => ConfigKind::SendNotification,
            Self::FileStorage(_) => ConfigKind::FileStorage,
            Self::FileRenaming(_) => ConfigKind::FileRenaming,
        }
    }

    /// Fields holding values outside their allowed range
    ///
    /// Pro and retoucher levels must be 1–5, and a moderation that lists
    /// outcomes must include `APPROVE`. Values are reported, never rewritten.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let level_ok = |level: Option<u8>| level.map_or(true, |l| (1..=5).contains(&l));
        let mut fields = Vec::new();
        match self {
            Self::ProAssigning(config) if !level_ok(config.min_pro_level) => {
                fields.push("minProLevel");
            }
            Self::RetoucherAssigning(config) if !level_ok(config.min_retoucher_level) => {
                fields.push("minRetoucherLevel");
            }
            Self::Moderation(config) => {
                if let Some(outcomes) = &config.outcomes {
                    if !outcomes.contains(&ModerationOutcome::Approve) {
                        fields.push("outcomes");
                    }
                }
            }
            _ => {}
        }
        fields
    }

    /// Block ids this payload routes the order to, with the field naming them
    pub fn step_references(&self) -> Vec<(&'static str, &str)> {
        let mut refs = Vec::new();
        match self {
            Self::Moderation(config) => {
                if let Some(id) = config.on_revision_step_id.as_deref() {
                    refs.push(("onRevisionStepId", id));
                }
                if let Some(RejectTarget::Step(id)) = config.on_reject.as_ref() {
                    refs.push(("onReject", id.as_str()));
                }
            }
            Self::IfElse(config) => {
                if let Some(id) = config.true_path_step_id.as_deref() {
                    refs.push(("truePathStepId", id));
                }
                if let Some(id) = config.false_path_step_id.as_deref() {
                    refs.push(("falsePathStepId", id));
                }
            }
            _ => {}
        }
        refs
    }
}

impl Merge for BlockConfig {
    /// Variants that differ cannot be merged; the override then wins whole.
    /// Callers check kinds up front (see [`crate::generator`]).
    fn merge(self, over: Self) -> Self {
        match (self, over) {
            (Self::ProAssigning(b), Self::ProAssigning(o)) => Self::ProAssigning(b.merge(o)),
            (Self::RetoucherAssigning(b), Self::RetoucherAssigning(o)) => {
                Self::RetoucherAssigning(b.merge(o))
            }
            (Self::Sst(b), Self::Sst(o)) => Self::Sst(b.merge(o)),
            (Self::Moderation(b), Self::Moderation(o)) => Self::Moderation(b.merge(o)),
            (Self::IfElse(b), Self::IfElse(o)) => Self::IfElse(b.merge(o)),
            (Self::ExternalProcess(b), Self::ExternalProcess(o)) => {
                Self::ExternalProcess(b.merge(o))
            }
            (Self::SendNotification(b), Self::SendNotification(o)) => {
                Self::SendNotification(b.merge(o))
            }
            (Self::FileStorage(b), Self::FileStorage(o)) => Self::FileStorage(b.merge(o)),
            (Self::FileRenaming(b), Self::FileRenaming(o)) => Self::FileRenaming(b.merge(o)),
            (_, over) => over,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::ProAssigning(c) => c.is_empty(),
            Self::RetoucherAssigning(c) => c.is_empty(),
            Self::Sst(c) => c.is_empty(),
            Self::Moderation(c) => c.is_empty(),
            Self::IfElse(c) => c.is_empty(),
            Self::ExternalProcess(c) => c.is_empty(),
            Self::SendNotification(c) => c.is_empty(),
            Self::FileStorage(c) => c.is_empty(),
            Self::FileRenaming(c) => c.is_empty(),
        }
    }
}

/// Deep-merge an optional default with an optional override
///
/// Returns `None` when neither side sets anything, so "no config" stays
/// distinguishable from an empty payload.
pub fn merge_configs(base: Option<BlockConfig>, over: Option<BlockConfig>) -> Option<BlockConfig> {
    nested(base, over).filter(|config| !config.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pro(strategy: Option<AssignmentStrategy>, photographers: Option<ShootSlots>) -> BlockConfig {
        BlockConfig::ProAssigning(ProAssigningConfig {
            strategy,
            photographers,
            ..Default::default()
        })
    }

    #[test]
    fn test_override_leaf_wins() {
        let base = pro(Some(AssignmentStrategy::Manual), None);
        let over = pro(Some(AssignmentStrategy::All), None);

        let merged = merge_configs(Some(base), Some(over)).unwrap();
        assert_eq!(merged, pro(Some(AssignmentStrategy::All), None));
    }

    #[test]
    fn test_nested_records_merge_per_field() {
        let base = pro(
            Some(AssignmentStrategy::Manual),
            Some(ShootSlots {
                count: Some(1),
                default_duration_minutes: Some(60),
            }),
        );
        let over = pro(
            None,
            Some(ShootSlots {
                count: Some(3),
                default_duration_minutes: None,
            }),
        );

        let merged = merge_configs(Some(base), Some(over)).unwrap();
        assert_eq!(
            merged,
            pro(
                Some(AssignmentStrategy::Manual),
                Some(ShootSlots {
                    count: Some(3),
                    default_duration_minutes: Some(60),
                }),
            )
        );
    }

    #[test]
    fn test_override_only_key_is_taken() {
        let base = BlockConfig::SendNotification(SendNotificationConfig {
            channel: Some(NotificationChannel::Email),
            ..Default::default()
        });
        let over = BlockConfig::SendNotification(SendNotificationConfig {
            body: Some("Hello {{client_name}}".to_string()),
            ..Default::default()
        });

        let merged = merge_configs(Some(base), Some(over)).unwrap();
        let BlockConfig::SendNotification(config) = merged else {
            panic!("Expected SendNotification config");
        };
        assert_eq!(config.channel, Some(NotificationChannel::Email));
        assert_eq!(config.body.as_deref(), Some("Hello {{client_name}}"));
        assert!(config.title.is_none());
    }

    #[test]
    fn test_empty_result_is_omitted() {
        assert_eq!(merge_configs(None, None), None);
        let empty = BlockConfig::FileStorage(FileStorageConfig::default());
        assert_eq!(merge_configs(Some(empty.clone()), Some(empty)), None);
    }

    #[test]
    fn test_invalid_fields_reported_without_rewriting() {
        let moderation = BlockConfig::Moderation(ModerationConfig {
            outcomes: Some([ModerationOutcome::Reject].into_iter().collect()),
            ..Default::default()
        });
        assert_eq!(moderation.invalid_fields(), vec!["outcomes"]);

        let retoucher = BlockConfig::RetoucherAssigning(RetoucherAssigningConfig {
            min_retoucher_level: Some(9),
            ..Default::default()
        });
        assert_eq!(retoucher.invalid_fields(), vec!["minRetoucherLevel"]);

        let pro = BlockConfig::ProAssigning(ProAssigningConfig {
            min_pro_level: Some(3),
            ..Default::default()
        });
        assert!(pro.invalid_fields().is_empty());
        assert!(BlockConfig::FileStorage(FileStorageConfig::default())
            .invalid_fields()
            .is_empty());
    }

    #[test]
    fn test_reject_target_wire_format() {
        let config = ModerationConfig {
            on_reject: Some(RejectTarget::CancelOrder),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"onReject": "CANCEL_ORDER"}));

        let parsed: ModerationConfig =
            serde_json::from_value(serde_json::json!({"onReject": "photo_shoot-photo-1a2b"}))
                .unwrap();
        assert_eq!(
            parsed.on_reject,
            Some(RejectTarget::Step("photo_shoot-photo-1a2b".to_string()))
        );
    }

    #[test]
    fn test_step_references() {
        let config = BlockConfig::IfElse(IfElseConfig {
            condition: Some("client_approved".to_string()),
            true_path_step_id: Some("send_to_client-photo-0001".to_string()),
            false_path_step_id: None,
        });
        assert_eq!(
            config.step_references(),
            vec![("truePathStepId", "send_to_client-photo-0001")]
        );
    }

    #[test]
    fn test_payload_is_externally_tagged() {
        let config = BlockConfig::FileStorage(FileStorageConfig {
            time_to_life: Some(90),
        });
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"fileStorage": {"timeToLife": 90}}));
    }
}
