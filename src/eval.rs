//! Tree-walking evaluator.
//!
//! Two mutually recursive dispatchers walk the tree: [`Evaluator::exec_stmt`]
//! executes statements for effect and [`Evaluator::eval_expr`] produces
//! values. Scopes form a chain of [`Env`] frames linked by `Rc`: blocks,
//! loop-body iterations, and function calls each push a fresh frame, and
//! every exit path (normal completion, `dön`, or a runtime error) releases
//! it by drop, so no unwind can leak a frame.
//!
//! Non-local control transfer (`dön`, `kır`, `devam`) travels in the
//! [`Flow`] result, a channel deliberately separate from [`RuntimeError`]:
//! a real error inside a function body can never be mistaken for its
//! return value.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use thiserror::Error;
use tracing::trace;

use crate::ast::{Expr, FunctionDecl, Program, Stmt};
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Errors raised during evaluation. Messages are user-facing and embed
/// the source line.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Satır {line}: Tanımsız değişken: {name}")]
    UndefinedVariable { name: String, line: u32 },

    #[error("Satır {line}: Tanımsız fonksiyon: {name}")]
    UndefinedFunction { name: String, line: u32 },

    #[error("Satır {line}: '{name}' bu kapsamda zaten tanımlı.")]
    Redeclaration { name: String, line: u32 },

    #[error("Satır {line}: '{name}' fonksiyonu bu kapsamda zaten tanımlı.")]
    FunctionRedeclaration { name: String, line: u32 },

    #[error("Satır {line}: Sabit '{name}' yeniden atanamaz.")]
    ConstReassignment { name: String, line: u32 },

    #[error("Satır {line}: '{name}' değişkeni {expected} türünde, {found} atanamaz.")]
    AssignTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
        line: u32,
    },

    #[error("Satır {line}: '{name}' bildirimi {expected} türünde değer bekliyor, {found} bulundu.")]
    DeclTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
        line: u32,
    },

    #[error("Satır {line}: '{param}' parametresi {expected} türünde değer bekliyor, {found} bulundu.")]
    ParamTypeMismatch {
        param: String,
        expected: &'static str,
        found: &'static str,
        line: u32,
    },

    #[error("Satır {line}: Operand sayı olmalıdır.")]
    NumberOperand { line: u32 },

    #[error("Satır {line}: Operandlar sayı olmalıdır.")]
    NumberOperands { line: u32 },

    #[error("Satır {line}: Operandlar sayı veya metin olmalıdır.")]
    AddOperands { line: u32 },

    #[error("Satır {line}: Sıfıra bölme hatası.")]
    DivisionByZero { line: u32 },

    #[error("Satır {line}: Dizi indeksi tam sayı olmalıdır.")]
    NonIntegerIndex { line: u32 },

    #[error("Satır {line}: Dizi sınırları dışında erişim: {index} (uzunluk {len}).")]
    IndexOutOfBounds { index: i64, len: usize, line: u32 },

    #[error("Satır {line}: Yalnızca dizi değerleri indekslenebilir.")]
    NotAnArray { line: u32 },

    #[error("Satır {line}: Yalnızca fonksiyon adları çağrılabilir.")]
    NotCallable { line: u32 },

    #[error("Satır {line}: '{name}' fonksiyonu {expected} argüman bekliyor, {found} verildi.")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        line: u32,
    },

    #[error("Satır {line}: Fonksiyon dışında 'dön' kullanılamaz.")]
    ReturnOutsideFunction { line: u32 },

    #[error("Satır {line}: Döngü dışında '{keyword}' kullanılamaz.")]
    LoopControlOutsideLoop { keyword: &'static str, line: u32 },

    #[error("Satır {line}: Geçersiz sabit değer: {lexeme}")]
    InvalidLiteral { lexeme: String, line: u32 },

    #[error("Satır {line}: Desteklenmeyen işleç: {op}")]
    UnsupportedOperator { op: String, line: u32 },

    #[error("Çıktı yazılamadı: {0}")]
    Io(#[from] std::io::Error),
}

/// Statement outcome: either fall through to the next statement or
/// transfer control outward. Distinct from the error channel.
#[derive(Debug)]
pub(crate) enum Flow {
    Normal,
    Break { line: u32 },
    Continue { line: u32 },
    Return { value: Value, line: u32 },
}

struct Binding {
    value: Value,
    is_const: bool,
}

struct AlreadyDefined;

enum AssignError {
    Undefined,
    Constant,
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// One scope frame: variable bindings, declared functions, and a link
/// to the enclosing frame. A name may be declared at most once per
/// frame; assignment resolves outward through the chain.
struct Env<'p> {
    parent: Option<Rc<Env<'p>>>,
    vars: RefCell<HashMap<&'p str, Binding>>,
    funcs: RefCell<HashMap<&'p str, &'p FunctionDecl<'p>>>,
}

impl<'p> Env<'p> {
    fn root() -> Rc<Env<'p>> {
        Rc::new(Env {
            parent: None,
            vars: RefCell::new(HashMap::new()),
            funcs: RefCell::new(HashMap::new()),
        })
    }

    fn with_parent(parent: Rc<Env<'p>>) -> Rc<Env<'p>> {
        Rc::new(Env {
            parent: Some(parent),
            vars: RefCell::new(HashMap::new()),
            funcs: RefCell::new(HashMap::new()),
        })
    }

    fn define(&self, name: &'p str, value: Value, is_const: bool) -> Result<(), AlreadyDefined> {
        match self.vars.borrow_mut().entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(Binding { value, is_const });
                Ok(())
            }
            Entry::Occupied(_) => Err(AlreadyDefined),
        }
    }

    fn define_function(
        &self,
        name: &'p str,
        decl: &'p FunctionDecl<'p>,
    ) -> Result<(), AlreadyDefined> {
        match self.funcs.borrow_mut().entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(decl);
                Ok(())
            }
            Entry::Occupied(_) => Err(AlreadyDefined),
        }
    }

    fn get(&self, name: &str) -> Option<Value> {
        match self.vars.borrow().get(name) {
            Some(binding) => Some(binding.value.clone()),
            None => self.parent.as_ref().and_then(|p| p.get(name)),
        }
    }

    fn function(&self, name: &str) -> Option<&'p FunctionDecl<'p>> {
        match self.funcs.borrow().get(name).copied() {
            Some(decl) => Some(decl),
            None => self.parent.as_ref().and_then(|p| p.function(name)),
        }
    }

    /// A variable's tag is fixed by its first non-nil value; later
    /// assignments must match it.
    fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        if let Some(binding) = self.vars.borrow_mut().get_mut(name) {
            if binding.is_const {
                return Err(AssignError::Constant);
            }
            if !matches!(binding.value, Value::Nil) && binding.value.type_name() != value.type_name()
            {
                return Err(AssignError::TypeMismatch {
                    expected: binding.value.type_name(),
                    found: value.type_name(),
                });
            }
            binding.value = value;
            return Ok(());
        }

        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(AssignError::Undefined),
        }
    }
}

/// Executes a parsed program against a fresh global environment,
/// writing `yaz` output to the injected writer.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
}

impl<'t, W: Write> Evaluator<'t, W> {
    pub fn new(output: &'t mut W) -> Evaluator<'t, W> {
        Evaluator { output }
    }

    pub fn run<'p>(&mut self, program: &'p Program<'p>) -> Result<(), RuntimeError> {
        let globals = Env::root();

        for stmt in &program.statements {
            match self.exec_stmt(stmt, &globals)? {
                Flow::Normal => {}
                Flow::Return { line, .. } => {
                    return Err(RuntimeError::ReturnOutsideFunction { line })
                }
                Flow::Break { line } => {
                    return Err(RuntimeError::LoopControlOutsideLoop {
                        keyword: "kır",
                        line,
                    })
                }
                Flow::Continue { line } => {
                    return Err(RuntimeError::LoopControlOutsideLoop {
                        keyword: "devam",
                        line,
                    })
                }
            }
        }

        Ok(())
    }

    fn exec_stmt<'p>(&mut self, stmt: &'p Stmt<'p>, env: &Rc<Env<'p>>) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.eval_expr(expr, env)?;
                Ok(Flow::Normal)
            }
            Stmt::Print(expr) => {
                let value = self.eval_expr(expr, env)?;
                writeln!(self.output, "{}", value)?;
                Ok(Flow::Normal)
            }
            Stmt::VarDecl {
                name,
                ty,
                is_array,
                is_const,
                init,
            } => {
                let value = match init {
                    Some(expr) => {
                        let value = self.eval_expr(expr, env)?;
                        if !matches_declared(ty.kind, *is_array, &value) {
                            return Err(RuntimeError::DeclTypeMismatch {
                                name: name.lexeme.to_string(),
                                expected: declared_type_name(ty.kind, *is_array),
                                found: value.type_name(),
                                line: name.line,
                            });
                        }
                        value
                    }
                    None => Value::Nil,
                };

                env.define(name.lexeme, value, *is_const)
                    .map_err(|_| RuntimeError::Redeclaration {
                        name: name.lexeme.to_string(),
                        line: name.line,
                    })?;
                Ok(Flow::Normal)
            }
            Stmt::Block(statements) => {
                let scope = Env::with_parent(env.clone());
                for stmt in statements {
                    let flow = self.exec_stmt(stmt, &scope)?;
                    if !matches!(flow, Flow::Normal) {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition, env)?.is_truthy() {
                    self.exec_stmt(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch, env)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::Loop { condition, body } => {
                while self.eval_expr(condition, env)?.is_truthy() {
                    // Fresh frame per iteration, so a declaration in the
                    // body does not collide with the previous pass.
                    let scope = Env::with_parent(env.clone());
                    match self.exec_stmt(body, &scope)? {
                        Flow::Normal | Flow::Continue { .. } => {}
                        Flow::Break { .. } => break,
                        ret @ Flow::Return { .. } => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Break { keyword } => Ok(Flow::Break { line: keyword.line }),
            Stmt::Continue { keyword } => Ok(Flow::Continue { line: keyword.line }),
            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return {
                    value,
                    line: keyword.line,
                })
            }
            Stmt::FunctionDecl(decl) => {
                env.define_function(decl.name.lexeme, decl).map_err(|_| {
                    RuntimeError::FunctionRedeclaration {
                        name: decl.name.lexeme.to_string(),
                        line: decl.name.line,
                    }
                })?;
                Ok(Flow::Normal)
            }
        }
    }

    fn eval_expr<'p>(&mut self, expr: &'p Expr<'p>, env: &Rc<Env<'p>>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal { token } => literal_value(token),
            Expr::Variable { name } => {
                env.get(name.lexeme)
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.lexeme.to_string(),
                        line: name.line,
                    })
            }
            Expr::Assign { name, value } => {
                let value = self.eval_expr(value, env)?;
                env.assign(name.lexeme, value.clone())
                    .map_err(|e| match e {
                        AssignError::Undefined => RuntimeError::UndefinedVariable {
                            name: name.lexeme.to_string(),
                            line: name.line,
                        },
                        AssignError::Constant => RuntimeError::ConstReassignment {
                            name: name.lexeme.to_string(),
                            line: name.line,
                        },
                        AssignError::TypeMismatch { expected, found } => {
                            RuntimeError::AssignTypeMismatch {
                                name: name.lexeme.to_string(),
                                expected,
                                found,
                                line: name.line,
                            }
                        }
                    })?;
                Ok(value)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand, env)?;
                match op.kind {
                    TokenKind::Minus => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::NumberOperand { line: op.line }),
                    },
                    TokenKind::Bang => Ok(Value::Bool(!value.is_truthy())),
                    _ => Err(unsupported(op)),
                }
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                apply_binary(op, left, right)
            }
            Expr::Comparison { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                apply_comparison(op, left, right)
            }
            Expr::Logical { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                match op.kind {
                    // The deciding operand is returned as-is, uncoerced.
                    TokenKind::AmpAmp => {
                        if !left.is_truthy() {
                            Ok(left)
                        } else {
                            self.eval_expr(right, env)
                        }
                    }
                    TokenKind::PipePipe => {
                        if left.is_truthy() {
                            Ok(left)
                        } else {
                            self.eval_expr(right, env)
                        }
                    }
                    _ => Err(unsupported(op)),
                }
            }
            Expr::Array { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element, env)?);
                }
                Ok(Value::Array(values))
            }
            Expr::ArrayAccess {
                array,
                bracket,
                index,
            } => {
                let array = self.eval_expr(array, env)?;
                let index = self.eval_expr(index, env)?;
                let line = bracket.line;

                let elements = match array {
                    Value::Array(elements) => elements,
                    _ => return Err(RuntimeError::NotAnArray { line }),
                };
                let number = match index {
                    Value::Number(n) => n,
                    _ => return Err(RuntimeError::NonIntegerIndex { line }),
                };
                if number.fract() != 0.0 {
                    return Err(RuntimeError::NonIntegerIndex { line });
                }

                let index = number as i64;
                if index < 0 || index as usize >= elements.len() {
                    return Err(RuntimeError::IndexOutOfBounds {
                        index,
                        len: elements.len(),
                        line,
                    });
                }
                Ok(elements[index as usize].clone())
            }
            Expr::Call {
                callee,
                paren,
                args,
            } => self.eval_call(callee, paren, args, env),
        }
    }

    fn eval_call<'p>(
        &mut self,
        callee: &'p Expr<'p>,
        paren: &Token<'p>,
        args: &'p [Expr<'p>],
        env: &Rc<Env<'p>>,
    ) -> Result<Value, RuntimeError> {
        // Only a plain name is callable; there are no function values.
        let name = match callee {
            Expr::Variable { name } => *name,
            _ => return Err(RuntimeError::NotCallable { line: paren.line }),
        };

        let decl =
            env.function(name.lexeme)
                .ok_or_else(|| RuntimeError::UndefinedFunction {
                    name: name.lexeme.to_string(),
                    line: name.line,
                })?;

        if args.len() != decl.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: name.lexeme.to_string(),
                expected: decl.params.len(),
                found: args.len(),
                line: paren.line,
            });
        }

        // Arguments evaluate in the caller's environment, left to right.
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, env)?);
        }

        trace!(name = name.lexeme, "calling function");

        let frame = Env::with_parent(env.clone());
        for (param, value) in decl.params.iter().zip(values) {
            if !matches_declared(param.ty.kind, param.is_array, &value) {
                return Err(RuntimeError::ParamTypeMismatch {
                    param: param.name.lexeme.to_string(),
                    expected: declared_type_name(param.ty.kind, param.is_array),
                    found: value.type_name(),
                    line: paren.line,
                });
            }
            frame
                .define(param.name.lexeme, value, false)
                .map_err(|_| RuntimeError::Redeclaration {
                    name: param.name.lexeme.to_string(),
                    line: param.name.line,
                })?;
        }

        for stmt in &decl.body {
            match self.exec_stmt(stmt, &frame)? {
                Flow::Normal => {}
                Flow::Return { value, .. } => return Ok(value),
                Flow::Break { line } => {
                    return Err(RuntimeError::LoopControlOutsideLoop {
                        keyword: "kır",
                        line,
                    })
                }
                Flow::Continue { line } => {
                    return Err(RuntimeError::LoopControlOutsideLoop {
                        keyword: "devam",
                        line,
                    })
                }
            }
        }

        Ok(Value::Nil)
    }
}

fn literal_value(token: &Token<'_>) -> Result<Value, RuntimeError> {
    match token.kind {
        TokenKind::NumberLiteral => token
            .lexeme
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| RuntimeError::InvalidLiteral {
                lexeme: token.lexeme.to_string(),
                line: token.line,
            }),
        TokenKind::StringLiteral => Ok(Value::Str(token.lexeme.to_string())),
        TokenKind::True => Ok(Value::Bool(true)),
        TokenKind::False => Ok(Value::Bool(false)),
        _ => Err(RuntimeError::InvalidLiteral {
            lexeme: token.lexeme.to_string(),
            line: token.line,
        }),
    }
}

fn apply_binary(op: &Token<'_>, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let line = op.line;
    match op.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::Str(a), b @ (Value::Number(_) | Value::Bool(_))) => {
                Ok(Value::Str(format!("{a}{b}")))
            }
            (a @ (Value::Number(_) | Value::Bool(_)), Value::Str(b)) => {
                Ok(Value::Str(format!("{a}{b}")))
            }
            _ => Err(RuntimeError::AddOperands { line }),
        },
        TokenKind::Minus => numeric(left, right, line).map(|(a, b)| Value::Number(a - b)),
        TokenKind::Star => numeric(left, right, line).map(|(a, b)| Value::Number(a * b)),
        TokenKind::StarStar => numeric(left, right, line).map(|(a, b)| Value::Number(a.powf(b))),
        TokenKind::Slash => {
            let (a, b) = numeric(left, right, line)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Ok(Value::Number(a / b))
        }
        TokenKind::Percent => {
            let (a, b) = numeric(left, right, line)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Ok(Value::Number(a % b))
        }
        _ => Err(unsupported(op)),
    }
}

fn apply_comparison(op: &Token<'_>, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op.kind {
        TokenKind::EqualEqual => Ok(Value::Bool(Value::is_equal(&left, &right))),
        TokenKind::BangEqual => Ok(Value::Bool(!Value::is_equal(&left, &right))),
        TokenKind::Less => numeric(left, right, op.line).map(|(a, b)| Value::Bool(a < b)),
        TokenKind::LessEqual => numeric(left, right, op.line).map(|(a, b)| Value::Bool(a <= b)),
        TokenKind::Greater => numeric(left, right, op.line).map(|(a, b)| Value::Bool(a > b)),
        TokenKind::GreaterEqual => numeric(left, right, op.line).map(|(a, b)| Value::Bool(a >= b)),
        _ => Err(unsupported(op)),
    }
}

fn numeric(left: Value, right: Value, line: u32) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        _ => Err(RuntimeError::NumberOperands { line }),
    }
}

fn unsupported(op: &Token<'_>) -> RuntimeError {
    RuntimeError::UnsupportedOperator {
        op: op.lexeme.to_string(),
        line: op.line,
    }
}

fn matches_declared(ty: TokenKind, is_array: bool, value: &Value) -> bool {
    if is_array {
        return matches!(value, Value::Array(_));
    }
    match ty {
        TokenKind::TypeString => matches!(value, Value::Str(_)),
        TokenKind::TypeNumber => matches!(value, Value::Number(_)),
        TokenKind::TypeBool => matches!(value, Value::Bool(_)),
        _ => false,
    }
}

fn declared_type_name(ty: TokenKind, is_array: bool) -> &'static str {
    if is_array {
        return "dizi";
    }
    match ty {
        TokenKind::TypeString => "metin",
        TokenKind::TypeNumber => "sayı",
        TokenKind::TypeBool => "doğruluk",
        _ => "boş",
    }
}
