//! Recursive-descent parser.
//!
//! One method per precedence level; each level folds its operators in a
//! loop and delegates tighter-binding operators to the next level.
//! Statement terminators (`;`) are always optional-match, never
//! required.
//!
//! Error policy: every grammar violation is reported immediately to the
//! error sink as a formatted diagnostic block, counted, and unwound via
//! [`SyncPoint`] to the statement loop, which resynchronizes and keeps
//! going so later mistakes are reported too. If anything was reported,
//! [`Parser::parse`] returns an *empty* program: a syntax error anywhere
//! discards the whole tree.

use std::io::Write;

use crate::ast::{Expr, FunctionDecl, Param, Program, Stmt};
use crate::diag;
use crate::token::{Token, TokenKind};

/// Control-transfer signal carrying the parser back to the nearest
/// statement-boundary recovery point. Not an error type: the diagnostic
/// has already been emitted by the time this propagates.
pub struct SyncPoint;

type ParseResult<T> = Result<T, SyncPoint>;

pub struct Parser<'t, 'a, W: Write> {
    tokens: &'t [Token<'a>],
    current: usize,
    error_count: usize,
    errors: &'t mut W,
}

impl<'t, 'a, W: Write> Parser<'t, 'a, W> {
    pub fn new(tokens: &'t [Token<'a>], errors: &'t mut W) -> Parser<'t, 'a, W> {
        Parser {
            tokens,
            current: 0,
            error_count: 0,
            errors,
        }
    }

    /// Parse the whole token sequence.
    ///
    /// Always runs to the terminating `Eof` so that every malformed
    /// statement gets a diagnostic, then returns either the full tree
    /// or, if anything failed, an empty program.
    pub fn parse(&mut self) -> Program<'a> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(SyncPoint) => self.synchronize(),
            }
        }

        if self.error_count > 0 {
            return Program { statements: Vec::new() };
        }

        Program { statements }
    }

    /// Number of syntax errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    ////// STATEMENTS //////

    fn statement(&mut self) -> ParseResult<Stmt<'a>> {
        if self.matches(TokenKind::Print) {
            return self.print_statement();
        }

        if self.matches(TokenKind::LeftCurly) {
            return self.block_statement();
        }

        if self.matches(TokenKind::If) {
            return self.if_statement();
        }

        if self.matches(TokenKind::Loop) {
            return self.loop_statement();
        }

        if self.matches(TokenKind::Break) {
            let keyword = self.previous();
            self.matches(TokenKind::Semicolon);
            return Ok(Stmt::Break { keyword });
        }

        if self.matches(TokenKind::Continue) {
            let keyword = self.previous();
            self.matches(TokenKind::Semicolon);
            return Ok(Stmt::Continue { keyword });
        }

        if self.matches(TokenKind::Return) {
            return self.return_statement();
        }

        if self.matches(TokenKind::Var) {
            return self.var_declaration(false);
        }

        if self.matches(TokenKind::Const) {
            return self.var_declaration(true);
        }

        if self.matches(TokenKind::Function) {
            return self.function_declaration();
        }

        self.expression_statement()
    }

    fn print_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let expr = self.expression()?;
        self.matches(TokenKind::Semicolon);
        Ok(Stmt::Print(expr))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let expr = self.expression()?;
        self.matches(TokenKind::Semicolon);
        Ok(Stmt::Expression(expr))
    }

    /// Current token is the one after `{`.
    fn block_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightCurly) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.consume(TokenKind::RightCurly, "Blok sonunda '}' bekleniyor.")?;
        Ok(Stmt::Block(statements))
    }

    /// Parentheses around the condition are optional.
    fn condition(&mut self) -> ParseResult<Expr<'a>> {
        if self.matches(TokenKind::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "Koşul sonunda ')' bekleniyor.")?;
            Ok(expr)
        } else {
            self.expression()
        }
    }

    fn if_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let condition = self.condition()?;
        let then_branch = Box::new(self.statement()?);

        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn loop_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let condition = self.condition()?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::Loop { condition, body })
    }

    fn return_statement(&mut self) -> ParseResult<Stmt<'a>> {
        let keyword = self.previous();

        let value = if self.check(TokenKind::Semicolon)
            || self.check(TokenKind::RightCurly)
            || self.is_at_end()
        {
            None
        } else {
            Some(self.expression()?)
        };

        self.matches(TokenKind::Semicolon);
        Ok(Stmt::Return { keyword, value })
    }

    fn var_declaration(&mut self, is_const: bool) -> ParseResult<Stmt<'a>> {
        let name = self.consume(TokenKind::Identifier, "Değişken adı bekleniyor.")?;
        self.consume(TokenKind::Colon, "Değişken adından sonra ':' bekleniyor.")?;
        let (ty, is_array) = self.type_annotation()?;

        let init = if self.matches(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        self.matches(TokenKind::Semicolon);
        Ok(Stmt::VarDecl {
            name,
            ty,
            is_array,
            is_const,
            init,
        })
    }

    /// `TYPE [ '[' ']' ]` where TYPE is one of the three type keywords.
    fn type_annotation(&mut self) -> ParseResult<(Token<'a>, bool)> {
        let ty = if self.matches(TokenKind::TypeString)
            || self.matches(TokenKind::TypeNumber)
            || self.matches(TokenKind::TypeBool)
        {
            self.previous()
        } else {
            return Err(self.error(self.peek(), "Tür adı bekleniyor."));
        };

        let is_array = if self.matches(TokenKind::LeftBracket) {
            self.consume(TokenKind::RightBracket, "Dizi türünde ']' bekleniyor.")?;
            true
        } else {
            false
        };

        Ok((ty, is_array))
    }

    fn function_declaration(&mut self) -> ParseResult<Stmt<'a>> {
        let name = self.consume(TokenKind::Identifier, "Fonksiyon adı bekleniyor.")?;

        let return_type = if self.matches(TokenKind::Colon) {
            let (ty, _) = self.type_annotation()?;
            Some(ty)
        } else {
            None
        };

        self.consume(TokenKind::Arrow, "Fonksiyon bildiriminde '=>' bekleniyor.")?;
        self.consume(TokenKind::LeftParen, "Parametre listesinde '(' bekleniyor.")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let param_name = self.consume(TokenKind::Identifier, "Parametre adı bekleniyor.")?;
                self.consume(TokenKind::Colon, "Parametre adından sonra ':' bekleniyor.")?;
                let (ty, is_array) = self.type_annotation()?;
                params.push(Param {
                    name: param_name,
                    ty,
                    is_array,
                });

                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Parametre listesinde ')' bekleniyor.")?;

        self.consume(TokenKind::LeftCurly, "Fonksiyon gövdesinde '{' bekleniyor.")?;
        let body = match self.block_statement()? {
            Stmt::Block(statements) => statements,
            _ => Vec::new(),
        };

        Ok(Stmt::FunctionDecl(FunctionDecl {
            name,
            return_type,
            params,
            body,
        }))
    }

    ////// EXPRESSIONS //////

    fn expression(&mut self) -> ParseResult<Expr<'a>> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr<'a>> {
        let expr = self.logical_or()?;

        if self.matches(TokenKind::Equal) {
            let equals = self.previous();
            let value = self.assignment()?;

            // Only a plain variable is a valid target; index expressions
            // have no assignment representation in the grammar.
            if let Expr::Variable { name } = expr {
                return Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                });
            }

            return Err(self.error(equals, "Geçersiz atama hedefi."));
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.logical_and()?;

        while self.matches(TokenKind::PipePipe) {
            let op = self.previous();
            let right = self.logical_and()?;
            expr = Expr::Logical {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.equality()?;

        while self.matches(TokenKind::AmpAmp) {
            let op = self.previous();
            let right = self.equality()?;
            expr = Expr::Logical {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.comparison()?;

        while self.matches(TokenKind::EqualEqual) || self.matches(TokenKind::BangEqual) {
            let op = self.previous();
            let right = self.comparison()?;
            expr = Expr::Comparison {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.term()?;

        while self.matches(TokenKind::Less)
            || self.matches(TokenKind::LessEqual)
            || self.matches(TokenKind::Greater)
            || self.matches(TokenKind::GreaterEqual)
        {
            let op = self.previous();
            let right = self.term()?;
            expr = Expr::Comparison {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.factor()?;

        while self.matches(TokenKind::Plus) || self.matches(TokenKind::Minus) {
            let op = self.previous();
            let right = self.factor()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.power()?;

        while self.matches(TokenKind::Star)
            || self.matches(TokenKind::Slash)
            || self.matches(TokenKind::Percent)
        {
            let op = self.previous();
            let right = self.power()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// `**` folds left: `2 ** 3 ** 2` is `(2 ** 3) ** 2`.
    fn power(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.unary()?;

        while self.matches(TokenKind::StarStar) {
            let op = self.previous();
            let right = self.unary()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr<'a>> {
        if self.matches(TokenKind::Minus) || self.matches(TokenKind::Bang) {
            let op = self.previous();
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        self.call()
    }

    /// Zero or more `(…)` / `[…]` suffixes may chain after a primary.
    fn call(&mut self) -> ParseResult<Expr<'a>> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenKind::LeftBracket) {
                expr = self.array_access(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr<'a>) -> ParseResult<Expr<'a>> {
        let mut args = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(
            TokenKind::RightParen,
            "Fonksiyon çağrısı sonunda ')' bekleniyor.",
        )?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        })
    }

    fn array_access(&mut self, array: Expr<'a>) -> ParseResult<Expr<'a>> {
        let index = self.expression()?;
        let bracket = self.consume(TokenKind::RightBracket, "Dizi erişiminde ']' bekleniyor.")?;

        Ok(Expr::ArrayAccess {
            array: Box::new(array),
            bracket,
            index: Box::new(index),
        })
    }

    /// Current token is the one after `[`.
    fn array_expression(&mut self) -> ParseResult<Expr<'a>> {
        let bracket = self.previous();
        let mut elements = Vec::new();

        if !self.check(TokenKind::RightBracket) {
            loop {
                elements.push(self.expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightBracket, "Dizi ifadesinde ']' bekleniyor.")?;
        Ok(Expr::Array { bracket, elements })
    }

    fn primary(&mut self) -> ParseResult<Expr<'a>> {
        if self.check(TokenKind::Error) {
            // Surface the lexer's own message.
            let token = self.peek();
            return Err(self.error(token, token.lexeme));
        }

        if self.matches(TokenKind::StringLiteral)
            || self.matches(TokenKind::NumberLiteral)
            || self.matches(TokenKind::True)
            || self.matches(TokenKind::False)
        {
            return Ok(Expr::Literal {
                token: self.previous(),
            });
        }

        if self.matches(TokenKind::LeftBracket) {
            return self.array_expression();
        }

        if self.matches(TokenKind::Identifier) {
            return Ok(Expr::Variable {
                name: self.previous(),
            });
        }

        if self.matches(TokenKind::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "İfade sonunda ')' bekleniyor.")?;
            return Ok(expr);
        }

        Err(self.error(self.peek(), "ifade bekleniyor."))
    }

    ////// HELPERS //////

    fn advance(&mut self) -> Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek().kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token<'a>> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error(self.peek(), message))
    }

    fn peek(&self) -> Token<'a> {
        self.tokens[self.current]
    }

    fn previous(&self) -> Token<'a> {
        self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Skip forward to the next likely statement boundary: just past a
    /// consumed `;`, or right before a statement-starting keyword.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Var
                | TokenKind::Const
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::Loop
                | TokenKind::Return
                | TokenKind::Print => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn error(&mut self, token: Token<'a>, message: &str) -> SyncPoint {
        self.error_count += 1;
        diag::report_syntax_error(self.errors, &token, message);
        SyncPoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(input: &str) -> (Program<'_>, String, usize) {
        let tokens = Lexer::new(input, "test.krz").scan();
        let mut sink = Vec::new();
        let mut parser = Parser::new(&tokens, &mut sink);
        let program = parser.parse();
        let count = parser.error_count();
        (program, String::from_utf8(sink).unwrap(), count)
    }

    fn parse_ok(input: &str) -> Program<'_> {
        let (program, errors, count) = parse(input);
        assert_eq!(count, 0, "unexpected syntax errors:\n{errors}");
        program
    }

    fn single_expr(input: &str) -> Expr<'_> {
        let mut program = parse_ok(input);
        assert_eq!(program.statements.len(), 1);
        match program.statements.pop() {
            Some(Stmt::Expression(e)) => e,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn number_literal() {
        match single_expr("42") {
            Expr::Literal { token } => assert_eq!(token.lexeme, "42"),
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn factors_bind_tighter_than_terms() {
        match single_expr("1 + 2 * 3") {
            Expr::Binary { op, right, .. } => {
                assert_eq!(op.lexeme, "+");
                match *right {
                    Expr::Binary { op, .. } => assert_eq!(op.lexeme, "*"),
                    other => panic!("unexpected rhs: {other:?}"),
                }
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn addition_is_left_associative() {
        match single_expr("1 + 2 + 3") {
            Expr::Binary { op, left, .. } => {
                assert_eq!(op.lexeme, "+");
                assert!(matches!(*left, Expr::Binary { .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn power_folds_left() {
        match single_expr("2 ** 3 ** 2") {
            Expr::Binary { op, left, right } => {
                assert_eq!(op.lexeme, "**");
                assert!(matches!(*left, Expr::Binary { .. }));
                assert!(matches!(*right, Expr::Literal { .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn unary_binds_tighter_than_power() {
        // -2 ** 2 is (-2) ** 2: the base is parsed by `unary`.
        match single_expr("-2 ** 2") {
            Expr::Binary { op, left, .. } => {
                assert_eq!(op.lexeme, "**");
                assert!(matches!(*left, Expr::Unary { .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn equality_and_ordering_share_the_comparison_node() {
        assert!(matches!(single_expr("1 == 2"), Expr::Comparison { .. }));
        assert!(matches!(single_expr("1 != 2"), Expr::Comparison { .. }));
        assert!(matches!(single_expr("1 < 2"), Expr::Comparison { .. }));
        assert!(matches!(single_expr("1 >= 2"), Expr::Comparison { .. }));
    }

    #[test]
    fn logical_operators_build_logical_nodes() {
        match single_expr("doğru && yanlış || doğru") {
            Expr::Logical { op, left, .. } => {
                assert_eq!(op.lexeme, "||");
                assert!(matches!(*left, Expr::Logical { .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn parenthesized_expression_has_no_extra_node() {
        assert!(matches!(single_expr("(1)"), Expr::Literal { .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        match single_expr("a = b = 1") {
            Expr::Assign { name, value } => {
                assert_eq!(name.lexeme, "a");
                assert!(matches!(*value, Expr::Assign { .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn assignment_target_must_be_a_variable() {
        let (program, errors, count) = parse("1 = 2");
        assert_eq!(count, 1);
        assert!(program.statements.is_empty());
        assert!(errors.contains("Geçersiz atama hedefi."));
    }

    #[test]
    fn index_assignment_is_a_parse_error() {
        let (program, errors, count) = parse("d[0] = 5");
        assert_eq!(count, 1);
        assert!(program.statements.is_empty());
        assert!(errors.contains("Geçersiz atama hedefi."));
    }

    #[test]
    fn call_and_index_suffixes_chain() {
        match single_expr("f(x)[0](y)") {
            Expr::Call { callee, .. } => {
                assert!(matches!(*callee, Expr::ArrayAccess { .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn empty_array_literal() {
        match single_expr("[]") {
            Expr::Array { elements, .. } => assert!(elements.is_empty()),
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn print_statement_with_optional_semicolon() {
        let program = parse_ok("yaz 1\nyaz 2;");
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[0], Stmt::Print(_)));
        assert!(matches!(program.statements[1], Stmt::Print(_)));
    }

    #[test]
    fn var_declaration_with_type_and_init() {
        let program = parse_ok("deg x: sayi = 5;");
        match &program.statements[0] {
            Stmt::VarDecl {
                name,
                ty,
                is_array,
                is_const,
                init,
            } => {
                assert_eq!(name.lexeme, "x");
                assert_eq!(ty.kind, TokenKind::TypeNumber);
                assert!(!*is_array);
                assert!(!*is_const);
                assert!(init.is_some());
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn const_array_declaration_without_init() {
        let program = parse_ok("sbt d: metin[]");
        match &program.statements[0] {
            Stmt::VarDecl {
                is_array, is_const, init, ..
            } => {
                assert!(*is_array);
                assert!(*is_const);
                assert!(init.is_none());
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn if_condition_parens_are_optional() {
        let with_parens = parse_ok("eğer (doğru) yaz 1 yoksa yaz 2");
        let without = parse_ok("eğer doğru { yaz 1 }");
        assert!(matches!(with_parens.statements[0], Stmt::If { .. }));
        assert!(matches!(without.statements[0], Stmt::If { .. }));
    }

    #[test]
    fn loop_statement_parses() {
        let program = parse_ok("döngü (x < 5) { x = x + 1 }");
        match &program.statements[0] {
            Stmt::Loop { body, .. } => assert!(matches!(**body, Stmt::Block(_))),
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn function_declaration_with_typed_params() {
        let program = parse_ok("fonk topla: sayi => (a: sayi, b: sayi) { dön a + b }");
        match &program.statements[0] {
            Stmt::FunctionDecl(decl) => {
                assert_eq!(decl.name.lexeme, "topla");
                assert_eq!(decl.return_type.map(|t| t.kind), Some(TokenKind::TypeNumber));
                assert_eq!(decl.params.len(), 2);
                assert_eq!(decl.params[0].name.lexeme, "a");
                assert_eq!(decl.body.len(), 1);
                assert!(matches!(decl.body[0], Stmt::Return { .. }));
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn function_declaration_without_return_type() {
        let program = parse_ok("fonk f => () { }");
        match &program.statements[0] {
            Stmt::FunctionDecl(decl) => {
                assert!(decl.return_type.is_none());
                assert!(decl.params.is_empty());
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn return_without_value() {
        let program = parse_ok("fonk f => () { dön }");
        match &program.statements[0] {
            Stmt::FunctionDecl(decl) => {
                assert!(matches!(decl.body[0], Stmt::Return { value: None, .. }));
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn break_and_continue_parse_anywhere() {
        let program = parse_ok("kır; devam");
        assert!(matches!(program.statements[0], Stmt::Break { .. }));
        assert!(matches!(program.statements[1], Stmt::Continue { .. }));
    }

    #[test]
    fn any_error_discards_the_whole_program() {
        let (program, errors, count) = parse("yaz 1; deg deg");
        assert_eq!(count, 1);
        assert!(program.statements.is_empty());
        assert!(errors.contains("Değişken adı bekleniyor."));
    }

    #[test]
    fn parser_resynchronizes_and_reports_later_errors() {
        let (program, errors, count) = parse("deg 1\nyaz )");
        assert_eq!(count, 2);
        assert!(program.statements.is_empty());
        assert!(errors.contains("Değişken adı bekleniyor."));
        assert!(errors.contains("ifade bekleniyor."));
    }

    #[test]
    fn diagnostics_carry_location_fields() {
        let (_, errors, _) = parse("yaz )");
        assert!(errors.contains("SÖZDİZİMİ HATASI"));
        assert!(errors.contains("Token: ')'"));
        assert!(errors.contains("Dosya: test.krz"));
        assert!(errors.contains("Satır: 1"));
    }

    #[test]
    fn lexer_error_tokens_surface_their_message() {
        let (program, errors, count) = parse("yaz \"açık");
        assert_eq!(count, 1);
        assert!(program.statements.is_empty());
        assert!(errors.contains("Sonlandırılmayan metinsel ifade"));
    }

    #[test]
    fn error_at_eof_reports_dosya_sonu() {
        let (_, errors, count) = parse("yaz (1");
        assert_eq!(count, 1);
        assert!(errors.contains("Dosya sonu:"));
    }

    #[test]
    fn compound_assignment_operators_are_not_in_the_grammar() {
        let (_, _, count) = parse("x += 1");
        assert_eq!(count, 1);
    }

    #[test]
    fn switch_keyword_has_no_statement_form() {
        let (_, _, count) = parse("eşle x { }");
        assert!(count > 0);
    }
}
