//! The ask/summarize/chat flow behind the `multiq` binary.

use std::collections::BTreeMap;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info};

use super::args::AskOptions;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::conversation::ConversationEngine;
use crate::error::{MultiqError, MultiqResult};
use crate::questions::{clamp_input, questions_for_submit, InputStats};
use crate::session::{ask, AskSession, AskSnapshot};
use crate::state::{AnswerSet, SummaryAction, SummaryStore};
use crate::traits::{HttpClient, SummaryBackend};

/// Typed in chat mode to leave the session.
pub const EXIT_COMMAND: &str = "/exit";

#[derive(Debug, Default)]
struct PrintedSlot {
    text: String,
    done: bool,
}

/// Writes answers incrementally from successive snapshots.
///
/// Snapshots may skip intermediate states; only the text not yet written is
/// printed. A final answer that does not extend the streamed text is printed
/// in full on a new line.
#[derive(Debug, Default)]
pub struct StreamPrinter {
    printed: BTreeMap<usize, PrintedSlot>,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<W: Write>(&mut self, snapshot: &AskSnapshot, out: &mut W) -> io::Result<()> {
        for (index, slot) in snapshot.answers.iter() {
            if !snapshot.answers.is_visible(index) {
                continue;
            }

            if !self.printed.contains_key(&index) {
                writeln!(out, "\n[{}] {}", index + 1, slot.question)?;
            }
            let printed = self.printed.entry(index).or_default();
            if printed.done {
                continue;
            }

            if slot.is_error {
                if !printed.text.is_empty() {
                    writeln!(out)?;
                }
                writeln!(out, "error: {}", slot.answer)?;
                printed.done = true;
                continue;
            }

            match slot.answer.strip_prefix(printed.text.as_str()) {
                Some(rest) => write!(out, "{}", rest)?,
                None => write!(out, "\n{}", slot.answer)?,
            }
            printed.text.clone_from(&slot.answer);

            if !slot.is_streaming {
                writeln!(out)?;
                printed.done = true;
            }
        }
        out.flush()
    }
}

async fn read_stdin() -> MultiqResult<String> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    Ok(text)
}

async fn collect_questions(options: &AskOptions, config: &ClientConfig) -> MultiqResult<Vec<String>> {
    let text = if options.questions.is_empty() {
        if options.chat.is_some() {
            return Err(MultiqError::input("--chat needs the questions as arguments"));
        }
        read_stdin().await?
    } else {
        options.questions.join("\n")
    };

    let clamped = clamp_input(&text, config.max_chars);
    if clamped.len() < text.len() {
        info!(max_chars = config.max_chars, "Input truncated");
    }
    let stats = InputStats::of(clamped);
    debug!(
        characters = stats.characters,
        words = stats.words,
        lines = stats.lines,
        "Question input"
    );
    questions_for_submit(clamped)
}

/// Fetch a summary for every answer that can have one, in index order.
pub async fn summarize_all<B: SummaryBackend + ?Sized>(backend: &B, answers: &AnswerSet) -> SummaryStore {
    let mut store = SummaryStore::new();
    let indices: Vec<usize> = answers.iter().map(|(index, _)| index).collect();

    for index in indices {
        let SummaryAction::Fetch(request) = store.request(index, answers) else {
            continue;
        };
        let summary = match backend.summarize(&request).await {
            Ok(reply) if reply.success => Some(reply.summary),
            Ok(_) => None,
            Err(err) => {
                debug!(index, error = %err, "Summary request failed");
                None
            }
        };
        store.complete(index, summary);
    }
    store
}

fn print_summaries(answers: &AnswerSet, store: &SummaryStore) {
    for (index, _) in answers.iter() {
        if let Some(summary) = store.summary(index) {
            println!("\n[{}] Short answer: {}", index + 1, summary);
        }
    }
}

async fn chat_loop<C: HttpClient>(api: &ApiClient<C>, session: &AskSession, number: usize) -> MultiqResult<()> {
    let slot = number
        .checked_sub(1)
        .and_then(|index| session.answers().get(index))
        .ok_or_else(|| MultiqError::input(format!("There is no answer {}", number)))?;
    let mut engine = ConversationEngine::open(slot)
        .ok_or_else(|| MultiqError::input(format!("Answer {} cannot be discussed", number)))?;

    println!("\n{}\n", engine.seed().content);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == EXIT_COMMAND {
            break;
        }
        if !engine.send(api, &line).await {
            continue;
        }
        match engine.error() {
            Some(err) => eprintln!("{}", err),
            None => {
                if let Some(reply) = engine.transcript().last() {
                    println!("[{}] {}\n", reply.formatted_time(), reply.content);
                }
            }
        }
    }

    engine.close();
    Ok(())
}

/// Run one question submission end to end.
///
/// Returns `Ok(false)` when the answer stream failed; the failure has already
/// been reported on stderr.
pub async fn run_ask<C: HttpClient>(
    api: &ApiClient<C>,
    config: &ClientConfig,
    options: AskOptions,
) -> MultiqResult<bool> {
    let questions = collect_questions(&options, config).await?;

    let (tx, mut rx) = watch::channel(AskSnapshot::default());
    let printer = tokio::spawn(async move {
        let mut printer = StreamPrinter::new();
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if let Err(err) = printer.render(&snapshot, &mut io::stdout().lock()) {
                debug!(error = %err, "Cannot write answers");
                break;
            }
        }
    });

    let session = ask(api, questions, Some(&tx)).await?;
    drop(tx);
    if let Err(err) = printer.await {
        debug!(error = %err, "Printer task ended abnormally");
    }

    if let Some(err) = session.error() {
        eprintln!("{}", err);
        return Ok(false);
    }

    if options.summarize {
        let summaries = summarize_all(api, session.answers()).await;
        print_summaries(session.answers(), &summaries);
    }
    if let Some(number) = options.chat {
        chat_loop(api, &session, number).await?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{Scripted, ScriptedBackend};
    use crate::events::AnswerEvent;

    fn render(printer: &mut StreamPrinter, answers: &AnswerSet) -> String {
        let snapshot = AskSnapshot {
            answers: answers.clone(),
            progress: 0.0,
            error: None,
            loading: true,
        };
        let mut out = Vec::new();
        printer.render(&snapshot, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_printer_writes_only_new_text() {
        let mut printer = StreamPrinter::new();
        let mut answers = AnswerSet::new();
        answers.apply_event(&AnswerEvent::Progress {
            index: 0,
            total: 1,
            current: 1,
            question: "Q1".to_string(),
        });
        answers.apply_event(&AnswerEvent::Token {
            index: 0,
            chunk: "Hel".to_string(),
        });
        assert_eq!(render(&mut printer, &answers), "\n[1] Q1\nHel");

        answers.apply_event(&AnswerEvent::Token {
            index: 0,
            chunk: "lo".to_string(),
        });
        assert_eq!(render(&mut printer, &answers), "lo");

        answers.apply_event(&AnswerEvent::AnswerDone {
            index: 0,
            question: "Q1".to_string(),
            answer: "Hello".to_string(),
            error: false,
        });
        assert_eq!(render(&mut printer, &answers), "\n");
        assert_eq!(render(&mut printer, &answers), "");
    }

    #[test]
    fn test_printer_reports_errors() {
        let mut printer = StreamPrinter::new();
        let mut answers = AnswerSet::new();
        answers.apply_event(&AnswerEvent::AnswerDone {
            index: 0,
            question: "Q1".to_string(),
            answer: "Model unavailable".to_string(),
            error: true,
        });
        assert_eq!(render(&mut printer, &answers), "\n[1] Q1\nerror: Model unavailable\n");
    }

    #[test]
    fn test_printer_rewrites_replaced_answer() {
        let mut printer = StreamPrinter::new();
        let mut answers = AnswerSet::new();
        answers.apply_event(&AnswerEvent::Progress {
            index: 0,
            total: 1,
            current: 1,
            question: "Q".to_string(),
        });
        answers.apply_event(&AnswerEvent::Token {
            index: 0,
            chunk: "draft".to_string(),
        });
        render(&mut printer, &answers);
        answers.apply_event(&AnswerEvent::AnswerDone {
            index: 0,
            question: "Q".to_string(),
            answer: "final".to_string(),
            error: false,
        });
        assert_eq!(render(&mut printer, &answers), "\nfinal\n");
    }

    #[tokio::test]
    async fn test_summarize_all_skips_ineligible_answers() {
        let mut answers = AnswerSet::new();
        for (index, error) in [(0, false), (1, true), (2, false)] {
            answers.apply_event(&AnswerEvent::AnswerDone {
                index,
                question: format!("Q{}", index + 1),
                answer: format!("A{}", index + 1),
                error,
            });
        }
        let backend = ScriptedBackend::with_script([Scripted::Reply("short".to_string()), Scripted::Declined]);

        let store = summarize_all(&backend, &answers).await;

        let requests = backend.summary_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].question, "Q1");
        assert_eq!(requests[1].question, "Q3");
        assert_eq!(store.summary(0), Some("short"));
        assert_eq!(store.summary(2), None);
        assert_eq!(store.in_flight(), None);
    }
}
