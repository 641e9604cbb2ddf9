//! Event formatting for the CLI.

use huddle_server::infrastructure::dto::websocket::{GroupRequestDto, MemberDto};
use huddle_shared::time::{get_timestamp, minutes_after_rfc3339};

use crate::session::{SessionEvent, SessionStatus};

const RULE: &str = "============================================================";

/// Event formatter for client display
pub struct EventFormatter;

impl EventFormatter {
    /// Format a session event
    ///
    /// # Arguments
    ///
    /// * `event` - The event emitted by the session
    /// * `now_millis` - Current time, used to show when a formed group's chat ends
    pub fn format_event(event: &SessionEvent, now_millis: i64) -> String {
        match event {
            SessionEvent::StatusChanged(status) => Self::format_status(*status),
            SessionEvent::Registered { client_id } => {
                format!("\n✓ Registered as {}\n", client_id)
            }
            SessionEvent::GroupCreated {
                request_id,
                request,
            } => Self::format_group_created(request_id, request),
            SessionEvent::GroupCancelled { request_id } => {
                format!("\n✗ Group request {} cancelled\n", request_id)
            }
            SessionEvent::GroupFormed {
                group_id,
                chat_time,
                members,
            } => Self::format_group_formed(group_id, *chat_time, members, now_millis),
            SessionEvent::GroupDisbanded { group_id } => {
                format!("\n- Group {} disbanded\n", group_id)
            }
        }
    }

    /// Format a status change
    pub fn format_status(status: SessionStatus) -> String {
        let label = match status {
            SessionStatus::Disconnected => "disconnected",
            SessionStatus::Connecting => "connecting...",
            SessionStatus::Connected => "connected",
        };
        format!("\n[status] {}\n", label)
    }

    fn format_group_created(request_id: &str, request: &GroupRequestDto) -> String {
        format!(
            "\n+ Group request {} waiting for a match\n  age {}-{}, within {} km, {} people, {} min\n",
            request_id,
            request.age_range.min,
            request.age_range.max,
            request.distance,
            request.group_size,
            request.chat_time
        )
    }

    fn format_group_formed(
        group_id: &str,
        chat_time: f64,
        members: &[MemberDto],
        now_millis: i64,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("Group {} formed\n", group_id));
        output.push_str(&format!(
            "Chat for {} min (until {})\n",
            chat_time,
            minutes_after_rfc3339(now_millis, chat_time)
        ));
        output.push_str("Members:\n");
        if members.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for member in members {
                let extra_photos = member
                    .additional_photo_data
                    .as_ref()
                    .map_or(0, |photos| photos.len());
                output.push_str(&format!(
                    "{} {} ({} photo{})\n",
                    member.first_name,
                    member.last_name,
                    1 + extra_photos,
                    if extra_photos == 0 { "" } else { "s" }
                ));
            }
        }
        output.push_str(&format!("{}\n", RULE));
        output
    }

    /// Format the reply to the `status` command
    pub fn format_status_report(status: SessionStatus, pending_request: Option<&str>) -> String {
        match pending_request {
            Some(request_id) => format!(
                "{}  pending request: {}\n",
                Self::format_status(status),
                request_id
            ),
            None => Self::format_status(status),
        }
    }

    /// Current time for `format_event`
    pub fn now() -> i64 {
        get_timestamp()
    }
}
