/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "products",
    aliases: &["p", "catalog", "home"],
    description: "Browse the catalog",
  },
  Command {
    name: "sales",
    aliases: &["s", "purchases", "orders"],
    description: "Purchase history",
  },
  Command {
    name: "sale",
    aliases: &["receipt"],
    description: "Open a sale by id (sale <id>)",
  },
  Command {
    name: "product",
    aliases: &["open", "id"],
    description: "Open a product by id (product <id>)",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit bazar",
  },
];

/// A parsed command line: name plus optional argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub name: &'static str,
  pub arg: Option<String>,
}

/// Resolve typed input ("product 3", "s") to a known command.
pub fn parse(input: &str) -> Option<Invocation> {
  let input = input.trim();
  let (head, rest) = match input.split_once(char::is_whitespace) {
    Some((head, rest)) => (head, Some(rest.trim())),
    None => (input, None),
  };

  let head = head.to_lowercase();
  let command = COMMANDS
    .iter()
    .find(|cmd| cmd.name == head || cmd.aliases.contains(&head.as_str()))?;

  Some(Invocation {
    name: command.name,
    arg: rest.filter(|r| !r.is_empty()).map(String::from),
  })
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  // Once an argument is being typed, the command is settled
  if input_lower.contains(char::is_whitespace) {
    return Vec::new();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let priority = if cmd.name == input_lower {
      0
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      1
    } else if cmd.name.starts_with(&input_lower) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      3
    } else if cmd.name.contains(&input_lower) {
      4
    } else if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      5
    } else {
      continue;
    };
    matches.push((cmd, priority));
  }

  // Stable sort keeps declaration order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
