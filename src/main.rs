use anyhow::{bail, Context, Result};
use log::info;
use recipe_features::config::{AppConfig, PageContext, RecipeContext};
use recipe_features::controller::RecipePage;
use recipe_features::ingredient_parser::parse_ingredient_list;
use recipe_features::recipe_data::RecipeDataClient;
use recipe_features::saved_recipes::SavedRecipes;
use recipe_features::scaling::render_scaled;
use recipe_features::shopping_list::ShoppingList;
use recipe_features::storage::JsonFileStore;
use std::env;
use std::io::{self, Read};

const USAGE: &str = "\
usage: recipe_features <command> [args]

  parse                      parse ingredient lines from stdin
  scale <multiplier>         print stdin ingredient lines scaled
  add <recipe-id> <title>    add stdin ingredient lines to the shopping list
  list                       show the shopping list grouped by recipe
  check <item-id>            toggle an entry's checked flag
  remove <item-id>           remove an entry
  clear-checked              remove every checked entry
  clear                      empty the shopping list
  clear-recipe <recipe-id>   remove the entries added by a recipe
  save <recipe-id> <title> <slug>
                             save or unsave a recipe
  saved                      show saved recipes";

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read ingredient lines from stdin")?;
    Ok(input)
}

fn arg(args: &[String], index: usize, name: &str) -> Result<String> {
    match args.get(index) {
        Some(value) => Ok(value.clone()),
        None => bail!("missing <{}>\n\n{}", name, USAGE),
    }
}

fn print_list(list: &ShoppingList<'_, JsonFileStore>) {
    let groups = list.group_by_recipe();
    if groups.is_empty() {
        println!("Your shopping list is empty");
        return;
    }
    for group in groups {
        println!("{}", group.title);
        for item in group.items {
            let mark = if item.checked { "x" } else { " " };
            let notes = item.notes.as_deref().map(|n| format!(" ({n})")).unwrap_or_default();
            println!("  [{}] {}{}  {}", mark, item.display_text(), notes, item.id);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::from_env();
    info!("Using store at: {}", config.store_path.display());
    let store = JsonFileStore::new(&config.store_path);

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let list = ShoppingList::new(&store);

    match command.as_str() {
        "parse" => {
            for parsed in parse_ingredient_list(&read_stdin()?) {
                println!("{}", serde_json::to_string(&parsed)?);
            }
        }
        "scale" => {
            let raw = arg(&args, 1, "multiplier")?;
            let multiplier: f64 = raw
                .parse()
                .with_context(|| format!("Invalid multiplier '{}'", raw))?;
            if !multiplier.is_finite() || multiplier <= 0.0 {
                bail!("Multiplier must be positive, got {}", multiplier);
            }
            for parsed in parse_ingredient_list(&read_stdin()?) {
                println!("{}", render_scaled(&parsed, multiplier));
            }
        }
        "add" => {
            let recipe_id = arg(&args, 1, "recipe-id")?;
            let title = arg(&args, 2, "title")?;
            let lines: Vec<String> = read_stdin()?
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            let context = config.page_context(Some(RecipeContext::new(&recipe_id, &title, "")));
            let page = RecipePage::from_lines(context, &store, &lines);
            println!("{}", page.add_to_shopping_list());
        }
        "list" => print_list(&list),
        "check" => {
            list.toggle_checked(&arg(&args, 1, "item-id")?);
            print_list(&list);
        }
        "remove" => {
            list.remove(&arg(&args, 1, "item-id")?);
            print_list(&list);
        }
        "clear-checked" => {
            list.clear_checked();
            print_list(&list);
        }
        "clear" => {
            list.clear_all();
            print_list(&list);
        }
        "clear-recipe" => {
            list.clear_by_recipe(&arg(&args, 1, "recipe-id")?);
            print_list(&list);
        }
        "save" => {
            let recipe = RecipeContext::new(
                &arg(&args, 1, "recipe-id")?,
                &arg(&args, 2, "title")?,
                &arg(&args, 3, "slug")?,
            );
            let page = RecipePage::from_lines(PageContext::for_recipe(recipe), &store, &[]);
            println!("{}", page.toggle_save());
        }
        "saved" => {
            let client = match &config.recipe_data_url {
                Some(url) => Some(RecipeDataClient::new(url, config.recipe_data_timeout)?),
                None => None,
            };
            let recipes = SavedRecipes::new(&store).display_recipes(client.as_ref()).await;
            if recipes.is_empty() {
                println!("No saved recipes");
            }
            for recipe in recipes {
                let url = recipe.url.unwrap_or_else(|| format!("/{}/", recipe.slug));
                println!("{}  {}  {}", recipe.id, recipe.title, url);
            }
        }
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}
