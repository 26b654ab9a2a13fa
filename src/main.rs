use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_client::{
    booking::{BookingFlow, PurchaseExecutor, Step},
    config::Config,
    models::{Credentials, Registration, Seat, Showtime, User},
    seating::{generate_seats, resolve_availability},
    AppState,
};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cinema booking client");

    let state = AppState::new(config);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let user = ensure_user(&state, &mut input).await?;
    info!("Logged in as {} (id {})", user.email, user.id);

    let mut flow = BookingFlow::new(state.session.clone());

    // Resume an interrupted checkout if one was persisted; otherwise the
    // guard falls back to the movie listing.
    if flow.resume_checkout().is_ok() {
        println!("Возобновляем незавершенное оформление...");
    }

    run_flow(&state, &mut flow, &user, &mut input).await
}

// The main loop: each iteration renders the current flow step.
async fn run_flow(
    state: &Arc<AppState>,
    flow: &mut BookingFlow,
    user: &User,
    input: &mut Input,
) -> anyhow::Result<()> {
    loop {
        match flow.step() {
            Step::SelectingShowtime => match pick_showtime(state, input).await? {
                Some(showtime_id) => flow.choose_showtime(showtime_id),
                None => {
                    println!("До встречи!");
                    return Ok(());
                }
            },
            Step::SelectingSeats => select_seats(state, flow, input).await?,
            Step::Confirming => confirm_purchase(state, flow, user, input).await?,
            Step::Completed => {
                println!("Покупка завершена. Приятного просмотра!");
                return Ok(());
            }
        }
    }
}

async fn prompt(input: &mut Input, text: &str) -> anyhow::Result<String> {
    use std::io::Write;
    print!("{}", text);
    std::io::stdout().flush()?;
    match input.next_line().await? {
        Some(line) => Ok(line.trim().to_string()),
        None => anyhow::bail!("stdin closed"),
    }
}

// Login with a persisted user when possible, otherwise ask for
// credentials or register a new account.
async fn ensure_user(state: &Arc<AppState>, input: &mut Input) -> anyhow::Result<User> {
    if let Some(user) = state.session.user()? {
        println!("С возвращением, {}!", user.name);
        return Ok(user);
    }

    loop {
        let choice = prompt(input, "Войти (в) или зарегистрироваться (р)? ").await?;
        let email = prompt(input, "Email: ").await?;
        let password = prompt(input, "Пароль: ").await?;

        let result = if choice.starts_with('р') || choice.starts_with('r') {
            let name = prompt(input, "Имя: ").await?;
            state
                .api
                .register(&Registration {
                    name,
                    email,
                    password,
                })
                .await
        } else {
            state.api.login(&Credentials { email, password }).await
        };

        match result {
            Ok(user) => {
                state.session.set_user(&user)?;
                return Ok(user);
            }
            Err(e) => println!("Не получилось: {}", e.user_message()),
        }
    }
}

// Movie browsing and showtime selection; returns None when the user quits.
async fn pick_showtime(state: &Arc<AppState>, input: &mut Input) -> anyhow::Result<Option<i64>> {
    loop {
        let movies = match state.api.get_movies().await {
            Ok(movies) => movies,
            Err(e) => {
                println!("Не удалось загрузить фильмы: {}", e.user_message());
                return Ok(None);
            }
        };
        if movies.is_empty() {
            println!("Сейчас нет фильмов в прокате.");
            return Ok(None);
        }

        println!("\nФильмы в прокате:");
        for movie in &movies {
            println!("  [{}] {} ({} мин)", movie.id, movie.title, movie.duration);
        }

        let answer = prompt(input, "Id фильма (или 'выход'): ").await?;
        if answer == "выход" || answer == "q" {
            return Ok(None);
        }
        let movie_id: i64 = match answer.parse() {
            Ok(id) => id,
            Err(_) => {
                println!("Нужен числовой id.");
                continue;
            }
        };

        let showtimes = match state.api.get_showtimes_for_movie(movie_id).await {
            Ok(showtimes) => showtimes,
            Err(e) => {
                println!("Не удалось загрузить сеансы: {}", e.user_message());
                continue;
            }
        };
        if showtimes.is_empty() {
            println!("Для этого фильма нет сеансов.");
            continue;
        }

        println!("\nСеансы:");
        for showtime in &showtimes {
            println!(
                "  [{}] {} {} - {} ({})",
                showtime.id,
                showtime.start_time.format("%d.%m %H:%M"),
                showtime.format,
                showtime.room.name,
                showtime.movie.title,
            );
        }

        let answer = prompt(input, "Id сеанса (или 'назад'): ").await?;
        if answer == "назад" {
            continue;
        }
        match answer.parse() {
            Ok(id) => return Ok(Some(id)),
            Err(_) => println!("Нужен числовой id."),
        }
    }
}

// Fetch the showtime and its sold tickets together and build the seat map.
async fn load_seat_map(
    state: &Arc<AppState>,
    showtime_id: i64,
) -> anyhow::Result<(Showtime, Vec<Seat>)> {
    let (showtime, sold) = futures::try_join!(
        state.api.get_showtime(showtime_id),
        state.api.get_tickets_for_showtime(showtime_id),
    )?;
    let mut seats = generate_seats(&showtime)?;
    resolve_availability(&mut seats, &sold);
    Ok((showtime, seats))
}

async fn select_seats(
    state: &Arc<AppState>,
    flow: &mut BookingFlow,
    input: &mut Input,
) -> anyhow::Result<()> {
    let showtime_id = match flow.showtime_id() {
        Some(id) => id,
        None => {
            flow.abandon()?;
            return Ok(());
        }
    };

    // Tag the fetch so a response that lands after a newer load began
    // would be dropped instead of overwriting fresh data.
    let epoch = flow.begin_seat_fetch();
    let (showtime, seats) = match load_seat_map(state, showtime_id).await {
        Ok(map) => map,
        Err(e) => {
            println!("Не удалось загрузить карту мест: {}", e);
            flow.abandon()?;
            return Ok(());
        }
    };
    if flow.is_stale_fetch(epoch) {
        return Ok(());
    }

    println!(
        "\n{} - {} {}, {}",
        showtime.movie.title,
        showtime.start_time.format("%d.%m %H:%M"),
        showtime.format,
        showtime.room.name
    );

    loop {
        render_seat_map(&seats, flow);
        if !flow.selection().is_empty() {
            println!(
                "Выбрано: {} | Итого: {:.2} $",
                flow.selection().labels(&seats).join(", "),
                flow.selection().total(&seats)
            );
        }

        let answer = prompt(input, "Место (например B3), 'готово' или 'назад': ").await?;
        match answer.as_str() {
            "готово" => match flow.proceed_to_checkout() {
                Ok(()) => return Ok(()),
                Err(e) => println!("{}", e),
            },
            "назад" => {
                flow.abandon()?;
                return Ok(());
            }
            label => match find_seat(&seats, label) {
                Some(seat) => {
                    if let Err(e) = flow.toggle_seat(seat) {
                        println!("{}", e);
                    }
                }
                None => println!("Нет такого места."),
            },
        }
    }
}

fn render_seat_map(seats: &[Seat], flow: &BookingFlow) {
    println!("\n              [ ЭКРАН ]");
    let mut current_row = None;
    for seat in seats {
        if current_row != Some(seat.row) {
            if current_row.is_some() {
                println!();
            }
            current_row = Some(seat.row);
            print!(
                "  {} ({:>8} {:>5.2} $) ",
                seat.row,
                seat.seat_type.as_str(),
                seat.price
            );
        }
        if !seat.available {
            print!("  X ");
        } else if flow.selection().contains(seat.id) {
            print!(" [{}]", seat.seat_number % 10);
        } else {
            print!("  {} ", seat.seat_number % 10);
        }
    }
    println!();
}

// Parse a "B3"-style label into a seat of the map.
fn find_seat<'a>(seats: &'a [Seat], label: &str) -> Option<&'a Seat> {
    let mut chars = label.chars();
    let row = chars.next()?.to_ascii_uppercase();
    let seat_number: u32 = chars.as_str().parse().ok()?;
    seats
        .iter()
        .find(|seat| seat.row == row && seat.seat_number == seat_number)
}

async fn confirm_purchase(
    state: &Arc<AppState>,
    flow: &mut BookingFlow,
    user: &User,
    input: &mut Input,
) -> anyhow::Result<()> {
    let showtime_id = match flow.showtime_id() {
        Some(id) => id,
        None => {
            flow.abandon()?;
            return Ok(());
        }
    };

    // The confirmation context is always re-fetched: availability may
    // have changed while the user was choosing.
    let (showtime, seats) = match load_seat_map(state, showtime_id).await {
        Ok(map) => map,
        Err(e) => {
            println!("Не удалось загрузить данные сеанса: {}", e);
            flow.abandon()?;
            return Ok(());
        }
    };
    let selected = flow.selection().seats(&seats);

    println!("\nПодтверждение покупки");
    println!("  Фильм:  {}", showtime.movie.title);
    println!("  Зал:    {}", showtime.room.name);
    println!(
        "  Начало: {}",
        showtime.start_time.format("%d.%m.%Y %H:%M")
    );
    println!(
        "  Места:  {}",
        flow.selection().labels(&seats).join(", ")
    );
    println!("  Итого:  {:.2} $", flow.selection().total(&seats));

    let answer = prompt(input, "Подтвердить покупку? (да/нет): ").await?;
    if answer != "да" {
        flow.back_to_seats()?;
        return Ok(());
    }

    // The in-flight guard keeps a second submission from starting while
    // this one is on the wire.
    flow.begin_purchase()?;
    let executor = PurchaseExecutor::new(state.api.clone());
    match executor.purchase(user, showtime_id, &selected).await {
        Ok(tickets) => {
            flow.complete_purchase()?;
            println!("\nВаши билеты:");
            for ticket in &tickets {
                println!(
                    "  Билет #{} - место {}, {}",
                    ticket.id,
                    ticket.seat.label(),
                    ticket.showtime.start_time.format("%d.%m %H:%M")
                );
            }
        }
        Err(e) => {
            println!("Покупка не удалась: {}", e.user_message());
            println!("Выбор сброшен: места могли быть уже проданы, выберите заново.");
            flow.fail_purchase()?;
        }
    }
    Ok(())
}
