#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Uploading,
    Processing,
    Success,
    Error,
}
