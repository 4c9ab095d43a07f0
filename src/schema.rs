use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::{Message, Update},
};

use crate::{
    commands::{help, quiz, start, statistics, Command},
    keyboard::{START_QUIZ_BUTTON, STATISTICS_BUTTON},
    runner,
};

/// Dispatch tree: commands and reply-keyboard texts first, then answer buttons.
pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Quiz].endpoint(quiz))
        .branch(case![Command::Statistics].endpoint(statistics));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::filter(|msg: Message| msg.text() == Some(START_QUIZ_BUTTON)).endpoint(quiz))
        .branch(
            dptree::filter(|msg: Message| msg.text() == Some(STATISTICS_BUTTON))
                .endpoint(statistics),
        )
        .endpoint(runner::invalid_input);

    let callback_handler = Update::filter_callback_query().endpoint(runner::take_answer);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}
