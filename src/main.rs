use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc::UnboundedReceiver;

use vision_assess::booking::{BookingBridge, BookingStage, TimeSlot};
use vision_assess::catalog::QuestionCatalog;
use vision_assess::config::AppConfig;
use vision_assess::error::Error;
use vision_assess::flow::AssessmentSession;
use vision_assess::navigation::{ChannelNavigator, NavigationIntent};
use vision_assess::screen::{SYNCING_HEADLINE, Screen};
use vision_assess::submission::{HttpWebhook, Submission, Webhook};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; the questionnaire owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    let booking_settings = config.booking.validate()?;
    let webhook: Arc<dyn Webhook> = Arc::new(HttpWebhook::new(&config.assessment)?);
    let submission = Arc::new(Submission::new(webhook, config.assessment.clone()));
    let (navigator, mut intents) = ChannelNavigator::new();

    eprintln!("👁  Vision Care Assessment v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Assessment webhook: {}", config.assessment.assessment_url);
    eprintln!(
        "   Booking: {}",
        booking_settings
            .external_booking_url
            .as_deref()
            .map(|url| format!("external ({url})"))
            .unwrap_or_else(|| "built-in calendar".to_string())
    );
    eprintln!("   Type the number of an option. 'b' goes back, 'q' quits.\n");

    let session = AssessmentSession::new(
        Arc::new(QuestionCatalog::reference()?),
        submission,
        Arc::new(navigator),
        booking_settings,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if let Some(intent) = pending_intent(&mut intents) {
            println!("\n→ Leaving the assessment: {intent}");
            break;
        }

        match session.screen().await {
            Screen::Question {
                question,
                current_step,
                total_steps,
                show_back,
            } => {
                println!("\nStep {current_step} of {total_steps}");
                println!("{}", question.prompt);
                for (i, option) in question.options.iter().enumerate() {
                    println!("  [{}] {}", i + 1, option.label);
                }
                let Some(input) = prompt(&mut lines, "> ").await? else {
                    break;
                };
                match input.as_str() {
                    "q" => break,
                    "b" if show_back => report(session.back().await),
                    choice => match pick(choice, question.options.len()) {
                        Some(i) => report(session.answer(&question.options[i].value).await),
                        None => println!("Please pick 1-{}", question.options.len()),
                    },
                }
            }
            Screen::LeadForm {
                current_step,
                total_steps,
            } => {
                println!("\nStep {current_step} of {total_steps}");
                println!("Almost there! Share your contact details to receive your personalized vision analysis.");
                let Some(first) = prompt(&mut lines, "First name ('b' to go back): ").await? else {
                    break;
                };
                if first == "b" {
                    report(session.back().await);
                    continue;
                }
                let Some(last) = prompt(&mut lines, "Last name: ").await? else {
                    break;
                };
                let Some(email) = prompt(&mut lines, "Email address: ").await? else {
                    break;
                };
                println!("\n{SYNCING_HEADLINE}");
                report(session.submit_lead(&first, &last, &email).await);
            }
            Screen::Syncing { headline } => println!("{headline}"),
            Screen::Result {
                message,
                first_name,
                show_not_now,
            } => {
                println!("\nYour Vision Analysis, {first_name}");
                println!("{message}\n");
                println!("  [1] Book my free consultation");
                if show_not_now {
                    println!("  [2] Not now, just email me the results");
                }
                println!("  [3] Continue to the follow-up page");
                println!("  [x] Close");
                let Some(input) = prompt(&mut lines, "> ").await? else {
                    break;
                };
                match input.as_str() {
                    "1" => {
                        let bridge = session.open_booking().await?;
                        run_booking(&bridge, &mut lines).await?;
                    }
                    "2" if show_not_now => report(session.not_now().await),
                    "3" => report(session.book_consultation().await),
                    "x" | "q" => report(session.close_result().await),
                    _ => println!("Please pick one of the options"),
                }
            }
        }
    }

    Ok(())
}

/// Drive the booking overlay until it is closed or hands off.
async fn run_booking(bridge: &BookingBridge, lines: &mut Input) -> anyhow::Result<()> {
    loop {
        let view = bridge.view().await;
        if let Some(error) = &view.error {
            println!("⚠️  {error}");
        }
        match view.stage {
            BookingStage::Phone => {
                println!("\nAlmost There! Enter your mobile to secure your results.");
                let Some(input) = prompt(lines, "UK mobile number ('x' to close): ").await? else {
                    return Ok(());
                };
                if input == "x" {
                    report(bridge.close().await.map_err(Error::from));
                    return Ok(());
                }
                println!("Connecting...");
                report(bridge.submit_phone(&input).await);
            }
            BookingStage::Redirecting => return Ok(()),
            BookingStage::Calendar => {
                println!(
                    "\nPreferred Time: pick a date between {} and {}",
                    view.min_date, view.max_date
                );
                let Some(date) = prompt(lines, "Date (YYYY-MM-DD, 'x' to close): ").await? else {
                    return Ok(());
                };
                if date == "x" {
                    report(bridge.close().await.map_err(Error::from));
                    return Ok(());
                }
                match date.parse::<chrono::NaiveDate>() {
                    Ok(date) => report(bridge.select_date(date).await),
                    Err(_) => {
                        println!("Dates look like 2026-03-14");
                        continue;
                    }
                }
                for (i, slot) in TimeSlot::ALL.iter().enumerate() {
                    println!("  [{}] {} ({})", i + 1, slot.label(), slot.hours());
                }
                let Some(choice) = prompt(lines, "> ").await? else {
                    return Ok(());
                };
                match pick(&choice, TimeSlot::ALL.len()) {
                    Some(i) => report(bridge.select_time(TimeSlot::ALL[i]).await),
                    None => continue,
                }
                if bridge.view().await.can_request_appointment() {
                    println!("Requesting...");
                    report(bridge.submit_appointment().await);
                }
            }
            BookingStage::Success => {
                println!("\n✅ Request Received");
                println!("Our coordinator will call you within 24 hours to finalize your slot.");
                prompt(lines, "Press Enter to go back to the site").await?;
                report(bridge.close().await.map_err(Error::from));
                return Ok(());
            }
        }
    }
}

async fn prompt(lines: &mut Input, text: &str) -> anyhow::Result<Option<String>> {
    print!("{text}");
    std::io::Write::flush(&mut std::io::stdout())?;
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

fn pick(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn pending_intent(rx: &mut UnboundedReceiver<NavigationIntent>) -> Option<NavigationIntent> {
    rx.try_recv().ok()
}

fn report<T>(result: Result<T, Error>) {
    if let Err(e) = result {
        println!("⚠️  {e}");
    }
}
