//! Interactive console front end.
//!
//! Stands in for the touch screen: each line is a command that maps onto one
//! catalog or voice operation, and results are printed back.

use crate::catalog::ProductCatalogView;
use crate::console::{ConsoleInput, ConsoleRecognizer};
use crate::errors::{Error, Result};
use crate::models::Product;
use crate::voice::{FlowOutcome, VoiceAddFlow};
use tokio::io::AsyncBufRead;

const HELP: &str = "Comandos:
  list                      lista los productos visibles
  search [texto]            filtra por nombre o descripción (vacío = todos)
  select <id>               selecciona un producto y lo copia al formulario
  unselect                  limpia el formulario y la selección
  set <campo> <valor>       campo: name, description, price, quantity
  add                       agrega el producto del formulario
  update                    guarda el formulario sobre el producto seleccionado
  delete                    elimina el producto seleccionado
  voice                     agrega un producto por voz
  retry                     repite la última pregunta de voz
  refresh                   recarga desde el servidor
  help                      muestra esta ayuda
  quit                      sale";

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the visible products
    List,
    /// Filter by name or description
    Search(String),
    /// Select a product by id
    Select(i64),
    /// Clear the selection and the form
    Unselect,
    /// Set one form field
    Set {
        /// Field name, English or Spanish
        field: String,
        /// New text for the field
        value: String,
    },
    /// Create a product from the form
    Add,
    /// Save the form over the selected product
    Update,
    /// Delete the selected product
    Delete,
    /// Start a voice-add dialog
    Voice,
    /// Ask the pending voice question again
    Retry,
    /// Reload from the store
    Refresh,
    /// Print the command list
    Help,
    /// Leave the loop
    Quit,
}

impl Command {
    /// Parses a command line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    /// Returns a message for the user when the line is not a valid command.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word.to_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "search" | "buscar" => Self::Search(rest.to_string()),
            "select" => {
                let id = rest
                    .parse()
                    .map_err(|_| format!("Id inválido: '{rest}'"))?;
                Self::Select(id)
            }
            "unselect" | "clear" => Self::Unselect,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "Uso: set <campo> <valor>".to_string())?;
                Self::Set {
                    field: field.to_lowercase(),
                    value: value.trim().to_string(),
                }
            }
            "add" => Self::Add,
            "update" => Self::Update,
            "delete" => Self::Delete,
            "voice" | "voz" => Self::Voice,
            "retry" => Self::Retry,
            "refresh" => Self::Refresh,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("Comando desconocido: '{other}'. Escriba 'help'.")),
        };
        Ok(Some(command))
    }
}

fn render_row(product: &Product, selected: Option<i64>) -> String {
    let marker = if selected == Some(product.id) { '*' } else { ' ' };
    format!(
        "{marker} #{:<4} {:<20} {:<30} {:>5} {:>9.2}",
        product.id, product.name, product.description, product.quantity, product.price
    )
}

async fn print_catalog(catalog: &ProductCatalogView) {
    if let Some(error) = catalog.load_error().await {
        println!("⚠ {}", error.message());
    }
    let products = catalog.visible_products().await;
    if products.is_empty() {
        println!("(sin productos)");
        return;
    }
    let selected = catalog.selected().await;
    for product in &products {
        println!("{}", render_row(product, selected));
    }
}

const ADD_FAILED: &str = "Error al agregar producto.";
const UPDATE_FAILED: &str = "Error al actualizar producto.";
const DELETE_FAILED: &str = "Error al eliminar el producto.";

/// Input problems are reported as they are; store failures name the operation.
fn failure_message(operation: &str, error: &Error) -> String {
    match error {
        Error::Validation { .. } | Error::NoSelection { .. } => error.user_message(),
        _ => format!("{operation} {}", error.user_message()),
    }
}

fn print_voice_outcome(outcome: &FlowOutcome) {
    match outcome.message() {
        Some(message) => println!("{message}"),
        None => println!("(sin respuesta; escriba 'retry' para repetir o 'voice' para empezar de nuevo)"),
    }
}

/// Reads commands until `quit` or end of input.
///
/// # Errors
/// Returns an error only if reading the input fails.
pub async fn run<R>(catalog: &ProductCatalogView, input: &ConsoleInput<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    let recognizer = ConsoleRecognizer::new(input);
    let mut voice = VoiceAddFlow::new(&recognizer, catalog);
    print_catalog(catalog).await;

    while let Some(line) = input.read_line("> ").await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        tracing::debug!(?command, "console command");

        match command {
            Command::List => print_catalog(catalog).await,
            Command::Search(text) => {
                catalog.set_query(&text).await;
                print_catalog(catalog).await;
            }
            Command::Select(id) => match catalog.select(id).await {
                Some(product) => println!("Seleccionado: {}", render_row(&product, Some(id))),
                None => println!("No hay un producto con id {id}."),
            },
            Command::Unselect => catalog.clear_selection().await,
            Command::Set { field, value } => {
                if !catalog.set_form_field(&field, &value).await {
                    println!("Campo desconocido: '{field}'");
                }
            }
            Command::Add => match catalog.submit_form().await {
                Ok(product) => println!("Producto agregado (#{}).", product.id),
                Err(e) => println!("{}", failure_message(ADD_FAILED, &e)),
            },
            Command::Update => match catalog.update_selected().await {
                Ok(_) => println!("Producto actualizado."),
                Err(e) => println!("{}", failure_message(UPDATE_FAILED, &e)),
            },
            Command::Delete => match catalog.delete_selected().await {
                Ok(_) => println!("Producto eliminado."),
                Err(e) => println!("{}", failure_message(DELETE_FAILED, &e)),
            },
            Command::Voice => print_voice_outcome(&voice.start().await),
            Command::Retry => print_voice_outcome(&voice.resume().await),
            Command::Refresh => {
                // The banner printed by the listing already reports failures
                let _ = catalog.refresh().await;
                print_catalog(catalog).await;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
    Ok(())
}
