mod quiz;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use log::{debug, info, warn};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove},
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use quiz::session::{Advance, Phase, Selection, Session, Tick};
use quiz::{Difficulty, SessionResult};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type DialogueStorage = Arc<ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Conversational position of a chat. Only this is persisted across process
/// restarts; the live session (questions, answers, timers) is in-memory, so
/// a crash mid-quiz loses the run and the chat is offered a fresh setup.
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    ReceiveTopic,
    ReceiveQuestionCount {
        topic: String,
    },
    ReceiveDifficulty {
        topic: String,
        count: usize,
    },
    ReceiveTimeLimit {
        topic: String,
        count: usize,
        difficulty: Difficulty,
    },
    InQuiz,
}

/// A live quiz run for one chat, plus the countdown task that drives it.
/// `round` grows every time a question is presented; a ticker that was
/// spawned for an older round treats itself as stale and exits.
struct SessionEntry {
    session: Session,
    ticker: Option<JoinHandle<()>>,
    round: u64,
}

type Sessions = Arc<Mutex<HashMap<ChatId, SessionEntry>>>;

const GENERATION_DELAY: Duration = Duration::from_secs(2);
const TIMEOUT_ADVANCE_PAUSE: Duration = Duration::from_secs(1);
const LOW_TIME_WARNING_SECONDS: u32 = 10;

const QUESTION_COUNT_CHOICES: [usize; 4] = [5, 10, 15, 20];
const TIME_CHOICES: [u32; 4] = [30, 60, 90, 120];
const DIFFICULTY_CHOICES: [Difficulty; 3] =
    [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

const NEXT_QUESTION_BUTTON: &str = "Next question ➡️";
const SHOW_RESULTS_BUTTON: &str = "Show my results 🏆";
const RESTART_BUTTON: &str = "Start a new quiz 🌟";
const RETAKE_BUTTON: &str = "Retake this quiz 🔄";

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    info!("Starting quizcraft bot...");

    let bot = Bot::from_env();

    let storage: DialogueStorage = SqliteStorage::open("db.sqlite", Json)
        .await
        .expect("Failed to open the dialogue database")
        .erase();

    let sessions: Sessions = Arc::new(Mutex::new(HashMap::new()));

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveTopic].endpoint(receive_topic))
            .branch(dptree::case![State::ReceiveQuestionCount { topic }].endpoint(receive_question_count))
            .branch(dptree::case![State::ReceiveDifficulty { topic, count }].endpoint(receive_difficulty))
            .branch(
                dptree::case![State::ReceiveTimeLimit { topic, count, difficulty }]
                    .endpoint(receive_time_limit),
            )
            .branch(dptree::case![State::InQuiz].endpoint(in_quiz)),
    )
    .dependencies(dptree::deps![storage, sessions])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Hi! I'm QuizCraft, an AI-style quiz generator 🧠\n\
    Tell me a topic and I'll put together a timed quiz for you.\n\n\
    What would you like to be quizzed on?\n\
    Popular topics: JavaScript, React, Python, AWS";

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    dialogue.update(State::ReceiveTopic).await?;
    Ok(())
}

async fn receive_topic(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    let topic = match msg.text() {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => {
            bot.send_message(msg.chat.id, "A quiz needs a topic! Please type one.")
                .await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, "How many questions?")
        .reply_markup(choice_keyboard(&QUESTION_COUNT_CHOICES))
        .await?;
    dialogue.update(State::ReceiveQuestionCount { topic }).await?;
    Ok(())
}

async fn receive_question_count(
    bot: Bot,
    dialogue: QuizDialogue,
    topic: String,
    msg: Message,
) -> HandlerResult {
    let count = msg.text().and_then(|text| text.trim().parse::<usize>().ok());
    let Some(count) = count.filter(|c| QUESTION_COUNT_CHOICES.contains(c)) else {
        bot.send_message(msg.chat.id, "Please pick 5, 10, 15 or 20 questions.")
            .reply_markup(choice_keyboard(&QUESTION_COUNT_CHOICES))
            .await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, "Pick a difficulty level")
        .reply_markup(choice_keyboard(&DIFFICULTY_CHOICES))
        .await?;
    dialogue
        .update(State::ReceiveDifficulty { topic, count })
        .await?;
    Ok(())
}

async fn receive_difficulty(
    bot: Bot,
    dialogue: QuizDialogue,
    (topic, count): (String, usize),
    msg: Message,
) -> HandlerResult {
    let Some(difficulty) = msg.text().and_then(|text| text.parse::<Difficulty>().ok()) else {
        bot.send_message(msg.chat.id, "Please pick easy, medium or hard.")
            .reply_markup(choice_keyboard(&DIFFICULTY_CHOICES))
            .await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, "How many seconds per question?")
        .reply_markup(choice_keyboard(&TIME_CHOICES))
        .await?;
    dialogue
        .update(State::ReceiveTimeLimit { topic, count, difficulty })
        .await?;
    Ok(())
}

async fn receive_time_limit(
    bot: Bot,
    dialogue: QuizDialogue,
    (topic, count, difficulty): (String, usize, Difficulty),
    msg: Message,
    sessions: Sessions,
) -> HandlerResult {
    let seconds = msg.text().and_then(|text| text.trim().parse::<u32>().ok());
    let Some(seconds) = seconds.filter(|s| TIME_CHOICES.contains(s)) else {
        bot.send_message(msg.chat.id, "Please pick 30, 60, 90 or 120 seconds.")
            .reply_markup(choice_keyboard(&TIME_CHOICES))
            .await?;
        return Ok(());
    };

    let chat = msg.chat.id;
    let config = quiz::SessionConfig {
        topic: topic.clone(),
        question_count: count,
        difficulty,
        seconds_per_question: seconds,
    };

    let mut session = Session::new();
    if session.begin(config).is_err() {
        // The topic was validated at the ReceiveTopic step, so this only
        // happens if something mangled the dialogue state. Start over.
        bot.send_message(chat, "The topic went missing — what would you like to be quizzed on?")
            .await?;
        dialogue.update(State::ReceiveTopic).await?;
        return Ok(());
    }
    info!("chat {}: generating {} questions about {:?}", chat, count, topic);

    sessions.lock().await.insert(
        chat,
        SessionEntry { session, ticker: None, round: 0 },
    );

    bot.send_message(
        chat,
        format!("🤖 Generating {count} questions about \"{topic}\"..."),
    )
    .reply_markup(KeyboardRemove::new())
    .await?;
    dialogue.update(State::InQuiz).await?;

    // Simulated "AI thinking" pause; the bank itself is instantaneous.
    tokio::time::sleep(GENERATION_DELAY).await;

    if let Some(entry) = sessions.lock().await.get_mut(&chat) {
        entry.session.complete_generation();
    }
    present_current_question(bot, chat, sessions).await?;
    Ok(())
}

async fn in_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    sessions: Sessions,
) -> HandlerResult {
    let chat = msg.chat.id;
    let Some(text) = msg.text().map(|t| t.to_string()) else {
        bot.send_message(chat, "Please use the buttons below.").await?;
        return Ok(());
    };

    let mut guard = sessions.lock().await;
    let Some(entry) = guard.get_mut(&chat) else {
        drop(guard);
        bot.send_message(
            chat,
            "Looks like your quiz session was lost. Let's set up a new one — what topic?",
        )
        .await?;
        dialogue.update(State::ReceiveTopic).await?;
        return Ok(());
    };

    match entry.session.phase() {
        Phase::Generating => {
            drop(guard);
            bot.send_message(chat, "Still generating your quiz, hang tight ⏳")
                .await?;
        }
        Phase::Active if !entry.session.is_resolved() => {
            let index = entry
                .session
                .current_question()
                .and_then(|q| q.options.iter().position(|option| option == &text));
            let Some(index) = index else {
                drop(guard);
                bot.send_message(chat, "Please pick one of the answer options.")
                    .await?;
                return Ok(());
            };

            match entry.session.select(index) {
                Selection::Recorded { correct } => {
                    if let Some(ticker) = entry.ticker.take() {
                        ticker.abort();
                    }
                    debug!(
                        "chat {}: answered {} ({}), {}/{} done, {}s elapsed",
                        chat,
                        index,
                        correct,
                        entry.session.answers().len(),
                        entry.session.total_questions(),
                        entry.session.elapsed_seconds(),
                    );
                    let feedback = entry
                        .session
                        .current_question()
                        .map(|q| answer_feedback(q, correct));
                    let keyboard = advance_keyboard(entry.session.on_last_question());
                    drop(guard);
                    if let Some(feedback) = feedback {
                        bot.send_message(chat, feedback).reply_markup(keyboard).await?;
                    }
                }
                Selection::Ignored => {
                    let locked_in = entry
                        .session
                        .chosen()
                        .zip(entry.session.current_question())
                        .map(|(chosen, q)| q.options[chosen].clone());
                    drop(guard);
                    let reply = match locked_in {
                        Some(option) => {
                            format!("You've already locked in \"{option}\" — tap Next ➡️")
                        }
                        None => "That one's already settled — tap Next ➡️".to_string(),
                    };
                    bot.send_message(chat, reply).await?;
                }
            }
        }
        Phase::Active => match text.as_str() {
            NEXT_QUESTION_BUTTON | SHOW_RESULTS_BUTTON => match entry.session.advance() {
                Advance::NextQuestion => {
                    drop(guard);
                    present_current_question(bot, chat, sessions).await?;
                }
                Advance::Finished => {
                    let summary = finished_summary(&entry.session);
                    drop(guard);
                    if let Some(summary) = summary {
                        bot.send_message(chat, summary)
                            .reply_markup(results_keyboard())
                            .await?;
                    }
                }
                Advance::Ignored => {
                    drop(guard);
                    bot.send_message(chat, "Please use the buttons below.").await?;
                }
            },
            _ => {
                let hint = answered_hint(entry.session.on_last_question());
                drop(guard);
                bot.send_message(chat, hint).await?;
            }
        },
        Phase::Results => match text.as_str() {
            RESTART_BUTTON => {
                if let Some(ticker) = entry.ticker.take() {
                    ticker.abort();
                }
                entry.session.restart();
                drop(guard);
                info!("chat {}: restarting from scratch", chat);
                bot.send_message(chat, "Fresh start! 🌟 What topic would you like this time?")
                    .reply_markup(KeyboardRemove::new())
                    .await?;
                dialogue.update(State::ReceiveTopic).await?;
            }
            RETAKE_BUTTON => {
                entry.session.retake();
                drop(guard);
                info!("chat {}: retaking the same quiz", chat);
                bot.send_message(chat, "Same questions, round two 🔄").await?;
                present_current_question(bot, chat, sessions).await?;
            }
            _ => {
                drop(guard);
                bot.send_message(chat, "The quiz is over — start a new one or retake this one.")
                    .reply_markup(results_keyboard())
                    .await?;
            }
        },
        Phase::Setup => {
            guard.remove(&chat);
            drop(guard);
            bot.send_message(chat, "Let's set up a quiz — what topic?").await?;
            dialogue.update(State::ReceiveTopic).await?;
        }
    }
    Ok(())
}

/// Sends the current question with its answer keyboard and arms a fresh
/// countdown for it. Any previous ticker for this chat is torn down first so
/// exactly one countdown runs per active question.
async fn present_current_question(bot: Bot, chat: ChatId, sessions: Sessions) -> HandlerResult {
    let (text, keyboard, round) = {
        let mut guard = sessions.lock().await;
        let Some(entry) = guard.get_mut(&chat) else {
            return Ok(());
        };
        let Some(question) = entry.session.current_question() else {
            return Ok(());
        };
        let text = format!(
            "Question {} of {} • ⏱ {}s\n\n{}",
            entry.session.question_number(),
            entry.session.total_questions(),
            entry.session.remaining_seconds(),
            question.prompt,
        );
        let keyboard = KeyboardMarkup::new(
            question
                .options
                .iter()
                .map(|option| vec![KeyboardButton::new(option.clone())]),
        );
        if let Some(ticker) = entry.ticker.take() {
            ticker.abort();
        }
        entry.round += 1;
        (text, keyboard, entry.round)
    };

    bot.send_message(chat, text).reply_markup(keyboard).await?;

    let ticker = spawn_countdown(bot, chat, sessions.clone(), round);
    if let Some(entry) = sessions.lock().await.get_mut(&chat) {
        entry.ticker = Some(ticker);
    }
    Ok(())
}

/// The per-question countdown: one tick per second against the session under
/// the registry lock. On expiry it reveals the answer and either renders the
/// results (last question) or auto-advances after a short pause. Exits as
/// soon as the question is resolved elsewhere or the round has moved on.
fn spawn_countdown(bot: Bot, chat: ChatId, sessions: Sessions, round: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await; // the first tick completes immediately

        loop {
            interval.tick().await;
            let outcome = {
                let mut guard = sessions.lock().await;
                let Some(entry) = guard.get_mut(&chat) else { return };
                if entry.round != round {
                    return;
                }
                entry.session.tick()
            };

            match outcome {
                Tick::Running { remaining } => {
                    if remaining == LOW_TIME_WARNING_SECONDS {
                        if let Err(err) = bot
                            .send_message(chat, format!("⏱ {remaining} seconds left!"))
                            .await
                        {
                            warn!("chat {}: failed to send the time warning: {}", chat, err);
                        }
                    }
                }
                Tick::Idle => return,
                Tick::Expired { finished } => {
                    let (reveal, summary) = {
                        let mut guard = sessions.lock().await;
                        let Some(entry) = guard.get_mut(&chat) else { return };
                        if entry.round != round {
                            return;
                        }
                        let reveal = entry.session.current_question().map(timeout_reveal);
                        let summary =
                            if finished { finished_summary(&entry.session) } else { None };
                        (reveal, summary)
                    };

                    if let Some(reveal) = reveal {
                        if let Err(err) = bot.send_message(chat, reveal).await {
                            warn!("chat {}: failed to send the timeout reveal: {}", chat, err);
                        }
                    }
                    if finished {
                        if let Some(summary) = summary {
                            if let Err(err) = bot
                                .send_message(chat, summary)
                                .reply_markup(results_keyboard())
                                .await
                            {
                                warn!("chat {}: failed to send the results: {}", chat, err);
                            }
                        }
                        return;
                    }

                    tokio::time::sleep(TIMEOUT_ADVANCE_PAUSE).await;
                    {
                        let mut guard = sessions.lock().await;
                        let Some(entry) = guard.get_mut(&chat) else { return };
                        if entry.round != round {
                            return;
                        }
                        entry.session.advance();
                        // The stored handle is this very task; presenting the
                        // next question aborts whatever handle is stored, so
                        // release it here instead of cancelling ourselves.
                        entry.ticker = None;
                    }
                    // Boxed to break the present -> countdown -> present cycle
                    // in the future types.
                    let next: Pin<Box<dyn Future<Output = HandlerResult> + Send>> =
                        Box::pin(present_current_question(bot.clone(), chat, sessions.clone()));
                    if let Err(err) = next.await {
                        warn!("chat {}: failed to present the next question: {}", chat, err);
                    }
                    return;
                }
            }
        }
    })
}

fn choice_keyboard<T: ToString>(choices: &[T]) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![choices
        .iter()
        .map(|choice| KeyboardButton::new(choice.to_string()))
        .collect::<Vec<_>>()])
}

fn advance_keyboard(on_last_question: bool) -> KeyboardMarkup {
    let label = if on_last_question { SHOW_RESULTS_BUTTON } else { NEXT_QUESTION_BUTTON };
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(label)]])
}

/// Reply for a repeated answer on an already-resolved question; names the
/// same button the advance keyboard is currently showing.
fn answered_hint(on_last_question: bool) -> String {
    let label = if on_last_question { SHOW_RESULTS_BUTTON } else { NEXT_QUESTION_BUTTON };
    format!("You've answered this one — tap {label}")
}

fn results_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(RETAKE_BUTTON)],
        vec![KeyboardButton::new(RESTART_BUTTON)],
    ])
}

fn answer_feedback(question: &quiz::Question, correct: bool) -> String {
    if correct {
        format!("✅ Correct! 🎉\n\n💡 {}", question.explanation)
    } else {
        format!(
            "❌ Not quite. The correct answer is: {}\n\n💡 {}",
            question.options[question.correct_answer], question.explanation
        )
    }
}

fn timeout_reveal(question: &quiz::Question) -> String {
    format!(
        "⏰ Time's up! The correct answer was: {}\n\n💡 {}",
        question.options[question.correct_answer], question.explanation
    )
}

fn finished_summary(session: &Session) -> Option<String> {
    let topic = session.config().map(|c| c.topic.clone())?;
    let result = session.result()?;
    info!(
        "quiz about {:?} finished: {}/{} in {}s",
        topic, result.correct_answers, result.total_questions, result.total_elapsed_seconds
    );
    Some(result_message(&topic, session.questions(), result))
}

fn result_message(topic: &str, questions: &[quiz::Question], result: &SessionResult) -> String {
    let percentage = result.percentage();
    let mut text = format!(
        "🏆 Quiz complete — {}!\n{}\n\n\
         Score: {}%\n\
         Correct: {}/{}\n\
         Time taken: {}\n\n",
        topic,
        score_message(percentage),
        percentage,
        result.correct_answers,
        result.total_questions,
        format_time(result.total_elapsed_seconds),
    );
    for (answer, question) in result.answers.iter().zip(questions) {
        let mark = if answer.is_correct {
            "✅"
        } else if answer.chosen.is_none() {
            "⏰"
        } else {
            "❌"
        };
        text.push_str(&format!("{} Question {} — {}\n", mark, answer.question_id, question.prompt));
    }
    text
}

fn score_message(percentage: u32) -> &'static str {
    if percentage >= 90 {
        "Outstanding! 🎉"
    } else if percentage >= 80 {
        "Excellent work! 🌟"
    } else if percentage >= 70 {
        "Good job! 👍"
    } else if percentage >= 60 {
        "Keep practicing! 💪"
    } else {
        "Don't give up! 📚"
    }
}

fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
