//! Conversation export: listing, history download, manifest construction.
//!
//! One export pass per conversation kind, both following the same shape:
//! list the candidates, print a human-readable summary, then (unless the
//! run is a dry run) download each conversation's full history, write it to
//! its own file, and finish with a per-kind manifest. Each pass returns the
//! user ids it encountered so the driver can merge them into the final
//! user list.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::{ConversationKind, SlackClient};
use crate::error::Result;
use crate::history;
use crate::pacing::Pacer;
use crate::users::{self, EncounteredUsers};

/// Slack names group direct messages with this marker; anything else
/// returned by `groups.list` is a private channel and out of scope.
pub const GROUP_DM_PREFIX: &str = "mpdm-";

/// Direct message manifest file name.
pub const DM_MANIFEST: &str = "dms.json";

/// Group direct message manifest file name.
pub const GROUP_DM_MANIFEST: &str = "mpims.json";

/// Final reconciled user list file name.
pub const USER_LIST: &str = "users.json";

/// Run-wide export settings.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub page_size: usize,
}

pub struct ConversationExporter<'a, P: Pacer> {
    client: &'a SlackClient,
    names: &'a HashMap<String, String>,
    options: &'a ExportOptions,
    pacer: &'a P,
}

impl<'a, P: Pacer> ConversationExporter<'a, P> {
    pub fn new(
        client: &'a SlackClient,
        names: &'a HashMap<String, String>,
        options: &'a ExportOptions,
        pacer: &'a P,
    ) -> Self {
        Self {
            client,
            names,
            options,
            pacer,
        }
    }

    /// Export every 1:1 direct message conversation. `owner_id` is the
    /// authenticated user, recorded as the first member of each manifest
    /// entry.
    pub async fn export_direct_messages(&self, owner_id: &str) -> Result<EncounteredUsers> {
        let dms = self.client.im_list().await?;

        println!("\nfound direct messages (1:1) with the following users:");
        for dm in &dms {
            println!("{}", users::display_name(self.names, &dm.user));
        }

        let mut encountered = EncounteredUsers::new();
        if self.options.dry_run {
            return Ok(encountered);
        }

        fs::create_dir_all(&self.options.output_dir)?;

        let mut manifest: Vec<Value> = Vec::new();
        for dm in &dms {
            encountered.insert(&dm.user);

            let name = users::display_name(self.names, &dm.user);
            info!("getting history for direct messages with {}", name);
            self.create_conversation_dir(&dm.id)?;

            let messages = history::fetch_history(
                self.client,
                ConversationKind::DirectMessage,
                &dm.id,
                self.options.page_size,
            )
            .await?;
            self.pacer.pause().await;

            manifest.push(json!({
                "id": dm.id,
                "created": dm.created,
                "members": [owner_id, dm.user],
            }));
            self.write_conversation(&dm.id, &messages)?;
        }

        info!(
            "writing direct message manifest for {} conversations",
            manifest.len()
        );
        self.write_manifest(DM_MANIFEST, &manifest)?;

        Ok(encountered)
    }

    /// Export every group direct message conversation. Groups whose name
    /// lacks the `mpdm-` prefix are private channels and are skipped.
    pub async fn export_group_direct_messages(&self) -> Result<EncounteredUsers> {
        let groups: Vec<_> = self
            .client
            .groups_list()
            .await?
            .into_iter()
            .filter(|group| group.name.starts_with(GROUP_DM_PREFIX))
            .collect();

        println!("\nfound group direct messages:");
        for group in &groups {
            println!("{}: ({} members)", group.name, group.members.len());
        }

        let mut encountered = EncounteredUsers::new();
        if self.options.dry_run {
            return Ok(encountered);
        }

        fs::create_dir_all(&self.options.output_dir)?;

        let mut manifest: Vec<Value> = Vec::new();
        for group in &groups {
            for member in &group.members {
                encountered.insert(member);
            }

            info!("getting history for group direct messages for {}", group.name);
            self.create_conversation_dir(&group.name)?;

            let messages = history::fetch_history(
                self.client,
                ConversationKind::GroupDirectMessage,
                &group.id,
                self.options.page_size,
            )
            .await?;
            self.pacer.pause().await;

            // The manifest keeps the raw group object untouched.
            manifest.push(group.raw.clone());
            self.write_conversation(&group.name, &messages)?;
        }

        info!(
            "writing group direct message manifest for {} conversations",
            manifest.len()
        );
        self.write_manifest(GROUP_DM_MANIFEST, &manifest)?;

        Ok(encountered)
    }

    /// Idempotent: creates the directory only if absent.
    fn create_conversation_dir(&self, dir_name: &str) -> Result<()> {
        fs::create_dir_all(self.options.output_dir.join(dir_name))?;
        Ok(())
    }

    fn write_conversation(&self, dir_name: &str, messages: &[Value]) -> Result<()> {
        let conversation_dir = self.options.output_dir.join(dir_name);
        let file_name = conversation_dir.join(format!("{}.json", dir_name));
        info!(
            "writing {} records to {}",
            messages.len(),
            file_name.display()
        );
        write_json_file(&file_name, messages)
    }

    fn write_manifest(&self, file_name: &str, manifest: &[Value]) -> Result<()> {
        write_json_file(&self.options.output_dir.join(file_name), manifest)
    }
}

/// Write the reconciled user list for the run.
pub fn write_user_list(output_dir: &Path, records: &[Value]) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(USER_LIST);
    info!("writing encountered user list to {}", path.display());
    write_json_file(&path, records)
}

/// Write a JSON document the way the export format requires: UTF-8,
/// 4-space indentation, non-ASCII characters kept literal. Whole-file
/// write-then-close, no atomic rename.
pub fn write_json_file<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    let mut file = fs::File::create(path)?;
    file.write_all(&buf)?;
    Ok(())
}
