//! Background reveal worker
//!
//! Owns the [`VerseRevealService`] on a tokio task so lookups and storage
//! writes never run on the caller's thread. Commands are handled one at a
//! time in arrival order, so at most one reveal is ever in flight.

use tokio::sync::mpsc;

use crate::api::VerseSource;
use crate::models::Verse;
use crate::reveal::{RevealProgress, RevealStore, VerseRevealService};

/// Commands sent from the front end to the worker
#[derive(Debug, Clone)]
pub enum RevealCommand {
    /// Reveal a verse the user has not seen
    Reveal,
    /// Ask whether a verse has been revealed
    Check {
        /// Verse number, e.g. "2.47"
        verse_number: String,
    },
    /// Record a verse the user read elsewhere
    Mark {
        /// Verse number, e.g. "2.47"
        verse_number: String,
    },
    /// Report current progress
    Progress,
    /// Forget every revealed verse
    Reset,
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the worker to the front end
#[derive(Debug)]
pub enum RevealEvent {
    /// Status message (for progress indicators)
    Status {
        /// Text to show
        message: String,
    },
    /// A new verse was revealed
    Revealed {
        /// The verse
        verse: Verse,
        /// Progress including this verse
        progress: RevealProgress,
    },
    /// Answer to [`RevealCommand::Check`]
    Checked {
        /// Verse asked about
        verse_number: String,
        /// Whether it has been revealed
        revealed: bool,
    },
    /// Answer to [`RevealCommand::Mark`]
    Marked {
        /// Verse that was marked
        verse_number: String,
        /// `false` if it was already revealed
        newly_revealed: bool,
        /// Progress after marking
        progress: RevealProgress,
    },
    /// Answer to [`RevealCommand::Progress`]
    Progress(RevealProgress),
    /// Revealed verses were cleared
    Reset,
    /// An error occurred
    Failed {
        /// Text to show next to a retry action
        message: String,
    },
}

/// Channel handles for communicating with the worker
pub struct RevealHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<RevealCommand>,
    /// Receive results from the worker
    pub event_rx: mpsc::Receiver<RevealEvent>,
}

/// Spawn the worker and return handles
pub fn spawn_worker<S, P>(mut service: VerseRevealService<S, P>) -> RevealHandle
where
    S: VerseSource + Send + Sync + 'static,
    P: RevealStore + Send + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<RevealCommand>(32);
    let (event_tx, event_rx) = mpsc::channel::<RevealEvent>(32);

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let event = match cmd {
                RevealCommand::Shutdown => break,
                RevealCommand::Reveal => {
                    let _ = event_tx
                        .send(RevealEvent::Status {
                            message: "Revealing verse...".to_string(),
                        })
                        .await;
                    handle_reveal(&mut service).await
                }
                RevealCommand::Check { verse_number } => RevealEvent::Checked {
                    revealed: service.is_revealed(&verse_number),
                    verse_number,
                },
                RevealCommand::Mark { verse_number } => {
                    match service.mark_revealed(&verse_number) {
                        Ok(newly_revealed) => RevealEvent::Marked {
                            verse_number,
                            newly_revealed,
                            progress: service.progress(),
                        },
                        Err(e) => RevealEvent::Failed {
                            message: format!("Could not mark verse {verse_number}: {e}"),
                        },
                    }
                }
                RevealCommand::Progress => RevealEvent::Progress(service.progress()),
                RevealCommand::Reset => match service.reset() {
                    Ok(()) => RevealEvent::Reset,
                    Err(e) => RevealEvent::Failed {
                        message: format!("Reset failed: {e:#}"),
                    },
                },
            };

            if event_tx.send(event).await.is_err() {
                tracing::debug!("Reveal event receiver dropped, stopping worker");
                break;
            }
        }
        tracing::debug!("Reveal worker shutting down");
    });

    RevealHandle { cmd_tx, event_rx }
}

async fn handle_reveal<S, P>(service: &mut VerseRevealService<S, P>) -> RevealEvent
where
    S: VerseSource,
    P: RevealStore,
{
    match service.fetch_unrevealed_verse().await {
        Ok(verse) => RevealEvent::Revealed {
            verse,
            progress: service.progress(),
        },
        Err(e) => RevealEvent::Failed {
            message: format!("Failed to fetch verse. Please try again. Error: {e}"),
        },
    }
}
