use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Type-erased cell value. Values are shared, never cloned, so large
/// datasets flow through the graph by reference.
pub type CellValue = Rc<dyn Any>;

type Compute = Rc<dyn Fn(&Inputs) -> Result<CellValue, CellError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    Unknown(String),
    Cycle(String),
    TypeMismatch(String),
    Failed(String, String),
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::Unknown(name) => write!(f, "no cell named {name:?}"),
            CellError::Cycle(name) => write!(f, "circular definition involving {name:?}"),
            CellError::TypeMismatch(name) => write!(f, "cell {name:?} holds a different type"),
            CellError::Failed(name, reason) => write!(f, "cell {name:?} failed: {reason}"),
        }
    }
}

impl std::error::Error for CellError {}

struct Cell {
    deps: Vec<String>,
    compute: Option<Compute>,
    value: Option<CellValue>,
    evaluations: usize,
}

/// The values of a derived cell's declared inputs, in declaration order.
pub struct Inputs {
    values: HashMap<String, CellValue>,
}

impl Inputs {
    /// Typed read of one input.
    pub fn get<T: 'static>(&self, name: &str) -> Result<Rc<T>, CellError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| CellError::Unknown(name.to_owned()))?;
        value
            .clone()
            .downcast::<T>()
            .map_err(|_| CellError::TypeMismatch(name.to_owned()))
    }
}

#[derive(Default)]
pub struct CellGraph {
    cells: HashMap<String, Cell>,
}

impl CellGraph {
    pub fn new() -> Self {
        CellGraph::default()
    }

    /// Define (or redefine) a derived cell. Its cached value, and those of
    /// its transitive dependents, are discarded.
    pub fn define<F>(&mut self, name: &str, deps: &[&str], compute: F)
    where
        F: Fn(&Inputs) -> Result<CellValue, CellError> + 'static,
    {
        self.cells.insert(
            name.to_owned(),
            Cell {
                deps: deps.iter().map(|d| (*d).to_owned()).collect(),
                compute: Some(Rc::new(compute)),
                value: None,
                evaluations: 0,
            },
        );
        self.invalidate_dependents(name);
    }

    /// Define or update a source cell holding a plain value.
    pub fn set<T: 'static>(&mut self, name: &str, value: T) {
        let cell = self.cells.entry(name.to_owned()).or_insert(Cell {
            deps: Vec::new(),
            compute: None,
            value: None,
            evaluations: 0,
        });
        cell.compute = None;
        cell.deps.clear();
        cell.value = Some(Rc::new(value));
        self.invalidate_dependents(name);
    }

    /// Evaluate a cell and read its value with the expected type.
    pub fn value<T: 'static>(&mut self, name: &str) -> Result<Rc<T>, CellError> {
        let value = self.evaluate(name, &mut Vec::new())?;
        value
            .downcast::<T>()
            .map_err(|_| CellError::TypeMismatch(name.to_owned()))
    }

    /// How many times a cell's compute function has run. Source cells stay
    /// at zero.
    pub fn evaluation_count(&self, name: &str) -> usize {
        self.cells.get(name).map_or(0, |c| c.evaluations)
    }

    fn evaluate(&mut self, name: &str, visiting: &mut Vec<String>) -> Result<CellValue, CellError> {
        let cell = self
            .cells
            .get(name)
            .ok_or_else(|| CellError::Unknown(name.to_owned()))?;
        if let Some(value) = &cell.value {
            return Ok(value.clone());
        }
        if visiting.iter().any(|n| n == name) {
            return Err(CellError::Cycle(name.to_owned()));
        }
        let Some(compute) = cell.compute.clone() else {
            // A source cell with no value yet.
            return Err(CellError::Unknown(name.to_owned()));
        };
        let deps = cell.deps.clone();

        visiting.push(name.to_owned());
        let mut values = HashMap::with_capacity(deps.len());
        for dep in &deps {
            values.insert(dep.clone(), self.evaluate(dep, visiting)?);
        }
        visiting.pop();

        let value = compute(&Inputs { values })?;
        let cell = self
            .cells
            .get_mut(name)
            .ok_or_else(|| CellError::Unknown(name.to_owned()))?;
        cell.value = Some(value.clone());
        cell.evaluations += 1;
        Ok(value)
    }

    /// Drop cached values downstream of `name`, leaving unrelated cells
    /// memoized.
    fn invalidate_dependents(&mut self, name: &str) {
        let mut queue = vec![name.to_owned()];
        while let Some(current) = queue.pop() {
            let dependents: Vec<String> = self
                .cells
                .iter()
                .filter(|(_, cell)| cell.deps.iter().any(|d| *d == current))
                .map(|(n, _)| n.clone())
                .collect();
            for dependent in dependents {
                if let Some(cell) = self.cells.get_mut(&dependent) {
                    if cell.value.take().is_some() {
                        queue.push(dependent);
                    }
                }
            }
        }
    }
}
